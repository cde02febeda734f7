//! # Hub Configuration
//!
//! [`HubConfig`] is fixed when a [`Hub`](crate::Hub) is constructed. It can be
//! built in code or loaded from a JSON, YAML (`yaml-config` feature) or TOML
//! (`toml-config` feature) document; missing keys take their defaults.
pub mod error;

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::kernel::constants::{DEFAULT_API_PREFIX, DEFAULT_POLL_INTERVAL_MS};
pub use error::ConfigError;

/// Document formats a [`HubConfig`] can be read from or rendered as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    #[cfg(feature = "yaml-config")]
    Yaml,
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Format implied by a file name (`.json`, `.yaml`/`.yml`, `.toml`),
    /// ignoring case. `None` for anything else.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Some(Self::Yaml),
            #[cfg(feature = "toml-config")]
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// How a boot attempt waits for its dependencies to appear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitStrategy {
    /// Re-check whenever a component registers.
    #[default]
    Notify,
    /// Re-check every `poll_interval_ms`.
    Poll,
}

/// Construction-time hub configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Prefix joined with an API name to find the component method.
    pub api_prefix: String,
    pub wait_strategy: WaitStrategy,
    pub poll_interval_ms: u64,
    /// `None` waits forever for dependencies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependency_timeout_ms: Option<u64>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            wait_strategy: WaitStrategy::default(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            dependency_timeout_ms: None,
        }
    }
}

impl HubConfig {
    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    pub fn with_wait_strategy(mut self, strategy: WaitStrategy) -> Self {
        self.wait_strategy = strategy;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = saturating_millis(interval);
        self
    }

    pub fn with_dependency_timeout(mut self, timeout: Duration) -> Self {
        self.dependency_timeout_ms = Some(saturating_millis(timeout));
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn dependency_timeout(&self) -> Option<Duration> {
        self.dependency_timeout_ms.map(Duration::from_millis)
    }

    /// Replaces unusable values with defaults: an empty prefix becomes
    /// `"api"` and a zero poll interval becomes 10ms.
    pub fn normalized(mut self) -> Self {
        if self.api_prefix.is_empty() {
            log::warn!("Empty API prefix configured, using '{}'", DEFAULT_API_PREFIX);
            self.api_prefix = DEFAULT_API_PREFIX.to_string();
        }
        if self.poll_interval_ms == 0 {
            log::warn!("Zero poll interval configured, using {}ms", DEFAULT_POLL_INTERVAL_MS);
            self.poll_interval_ms = DEFAULT_POLL_INTERVAL_MS;
        }
        self
    }

    /// Parse a configuration document in the given format.
    pub fn deserialize(data: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Json => serde_json::from_str(data).map_err(|e| {
                ConfigError::DeserializationError { format: "json", source: Box::new(e) }
            }),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| {
                ConfigError::DeserializationError { format: "yaml", source: Box::new(e) }
            }),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| {
                ConfigError::DeserializationError { format: "toml", source: Box::new(e) }
            }),
        }
    }

    /// Render this configuration in the given format.
    pub fn serialize(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self).map_err(|e| {
                ConfigError::SerializationError { format: "json", source: Box::new(e) }
            }),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(self).map_err(|e| {
                ConfigError::SerializationError { format: "yaml", source: Box::new(e) }
            }),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| {
                ConfigError::SerializationError { format: "toml", source: Box::new(e) }
            }),
        }
    }

    /// Load a configuration file, picking the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedConfigFormat(path.to_path_buf()))?;
        let data = std::fs::read_to_string(path).map_err(|e| ConfigError::io(e, path))?;
        log::debug!("Loaded hub configuration from {}", path.display());
        Self::deserialize(&data, format)
    }
}

fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
