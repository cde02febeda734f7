//! # Hub Configuration Errors
//!
//! Defines [`ConfigError`], raised while reading or parsing a [`HubConfig`](super::HubConfig)
//! from disk or from an in-memory document.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error while reading configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported configuration format: {0}")]
    UnsupportedConfigFormat(PathBuf),

    #[error("Deserialization from '{format}' failed: {source}")]
    DeserializationError {
        format: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Serialization to '{format}' failed: {source}")]
    SerializationError {
        format: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl ConfigError {
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        ConfigError::Io {
            source,
            path: path.into(),
        }
    }
}
