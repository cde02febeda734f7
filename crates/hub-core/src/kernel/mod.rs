//! # Hub Kernel
//!
//! The `kernel` module holds the parts of the hub that every caller touches:
//!
//! - **Component contract**: the [`Component`](component::Component) trait, its
//!   optional [`BootHook`](component::BootHook) capability and the
//!   [`ApiTable`](component::ApiTable) a component exposes to its peers.
//! - **Boot sequencing and API dispatch**: the [`Hub`](bootstrap::Hub) handle,
//!   which validates boot batches, runs one boot attempt per entry and routes
//!   `api` calls to registered components.
//! - **Constants**: defaults shared by configuration and the registry.
//! - **Error handling**: [`HubError`](error::HubError) and the `Result` alias.
pub mod bootstrap;
pub mod component;
pub mod constants;
pub mod error;

pub use bootstrap::{BootEntry, Hub};
pub use component::{ApiTable, BootHook, Component};
pub use error::{HubError, Result};
// Test module declaration
#[cfg(test)]
mod tests;
