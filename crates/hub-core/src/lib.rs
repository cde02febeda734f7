//! # hub-core
//!
//! An in-process component registry. Components are booted in dependency
//! order and then talk to one another through a uniform, prefix-named API
//! convention instead of holding direct references.
//!
//! The entry point is [`Hub`]: submit a batch of [`BootEntry`] values to
//! [`Hub::register`], then call across components with [`Hub::api`].
pub mod config;
pub mod event;
pub mod kernel;
pub mod registry;

pub use config::{ConfigFormat, HubConfig, WaitStrategy};
pub use event::{Event, EventDispatcher, EventResult, HubEvent};
pub use kernel::bootstrap::{BootEntry, Hub};
pub use kernel::component::{ApiResult, ApiTable, BootHook, Component, ComponentError};
pub use kernel::error::{HubError, Result};
pub use registry::Registry;

#[cfg(test)]
mod tests;
