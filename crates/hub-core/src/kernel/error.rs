//! # Hub Kernel Errors
//!
//! Defines [`HubError`], the error type returned by every fallible hub
//! operation: batch validation, dependency waiting, boot attempts and API
//! dispatch.
//!
//! Errors raised by a component's own boot hook or API method are carried in
//! [`HubError::Component`] without any wrapping text, so callers see exactly
//! what the component produced and can downcast it.
use std::result::Result as StdResult;
use std::time::Duration;

use thiserror::Error as ThisError;

use crate::config::error::ConfigError;
use crate::kernel::component::ComponentError;

/// Error type for hub operations
#[derive(Debug, ThisError)]
pub enum HubError {
    /// A batch entry had an empty component name.
    #[error("Component name should be provided (batch entry {position})")]
    InvalidComponentName { position: usize },

    /// A batch entry had no component instance.
    #[error("Component object should be provided for component '{name}'")]
    InvalidComponentInstance { name: String },

    /// The target component is not registered or does not expose the API.
    #[error("API '{api}' not found on component '{component}'")]
    ApiNotFound { component: String, api: String },

    /// Opt-in dependency timeout elapsed before every dependency registered.
    #[error("Component '{component}' gave up after {waited:?} waiting for dependencies: {missing:?}")]
    DependencyTimeout {
        component: String,
        missing: Vec<String>,
        waited: Duration,
    },

    /// A boot attempt ended without producing a result (panic or cancellation).
    #[error("Boot attempt aborted: {reason}")]
    BootAborted { reason: String },

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error raised by a component's boot hook or API method, passed through as-is.
    #[error(transparent)]
    Component(ComponentError),
}

impl HubError {
    /// Returns the component-raised error, if this is one.
    pub fn as_component_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            HubError::Component(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, HubError>;
