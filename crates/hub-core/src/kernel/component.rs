use std::any::Any;
use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::kernel::bootstrap::Hub;

/// Error a component raises from its boot hook or an API method
pub type ComponentError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of an API method call
pub type ApiResult = Result<Value, ComponentError>;

/// Owned future returned by an API method
pub type ApiFuture = Pin<Box<dyn Future<Output = ApiResult> + Send + 'static>>;

/// Type-erased API method. The component it belongs to is captured inside.
pub type ApiMethod = Arc<dyn Fn(Value) -> ApiFuture + Send + Sync>;

/// Boot capability of a component.
///
/// The hook runs once the component's dependencies are registered. Returning
/// `Ok(())` is the completion signal: the component is registered right after.
/// Returning an error fails the boot attempt and the component stays
/// unregistered.
#[async_trait]
pub trait BootHook: Send + Sync {
    async fn boot(&self, hub: Hub) -> Result<(), ComponentError>;
}

/// A unit managed by the hub.
///
/// Only components that expose a [`BootHook`] are ever added to the registry.
pub trait Component: Any + Send + Sync + Debug {
    /// The boot capability, if any. Implementors usually return `Some(self)`.
    fn boot_hook(&self) -> Option<&dyn BootHook> {
        None
    }

    /// Methods this component exposes to its peers, keyed by full method name
    /// (API prefix included, e.g. `apiSendMail`).
    ///
    /// Called once per registration. Methods capture `self` so they run
    /// against the registered instance.
    fn apis(self: Arc<Self>) -> ApiTable {
        ApiTable::new()
    }
}

/// Map of method name to callable, built by a component when it registers.
#[derive(Clone, Default)]
pub struct ApiTable {
    methods: HashMap<String, ApiMethod>,
}

impl ApiTable {
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    /// Adds (or replaces) a method.
    pub fn method<F, Fut>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult> + Send + 'static,
    {
        let method: ApiMethod = Arc::new(move |args: Value| -> ApiFuture { Box::pin(f(args)) });
        self.methods.insert(name.into(), method);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<ApiMethod> {
        self.methods.get(name).cloned()
    }

    /// Method names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl Debug for ApiTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiTable")
            .field("methods", &self.names())
            .finish()
    }
}
