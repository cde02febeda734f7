//! # Component Registry
//!
//! Owns every booted component, keyed by name. Each record holds the
//! instance, the API table it built at registration and the registration
//! timestamp, so a name has a timestamp exactly when it has an instance.
//!
//! Successful registrations bump a generation counter that
//! [`DependencyWaiter`](waiter::DependencyWaiter) subscribes to.
pub mod waiter;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, SystemTime};

use tokio::sync::watch;

use crate::kernel::component::{ApiMethod, ApiTable, Component};

pub use waiter::DependencyWaiter;

/// A registered component
#[derive(Clone, Debug)]
pub struct ComponentRecord {
    pub instance: Arc<dyn Component>,
    pub apis: ApiTable,
    pub registered_at: SystemTime,
}

/// Name-keyed store of booted components
///
/// Records are only written by [`Hub`](crate::Hub) once a boot hook
/// completes, so every entry here was announced with a
/// `component.registered` event.
///
/// ```compile_fail
/// use std::sync::Arc;
/// use std::time::SystemTime;
///
/// #[derive(Debug)]
/// struct Quiet;
/// impl hub_core::Component for Quiet {}
///
/// let hub = hub_core::Hub::new();
/// hub.registry().register("Quiet", Arc::new(Quiet), SystemTime::now());
/// ```
pub struct Registry {
    api_prefix: String,
    records: RwLock<HashMap<String, ComponentRecord>>,
    last_stamp: Mutex<Option<SystemTime>>,
    generation: watch::Sender<u64>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("api_prefix", &self.api_prefix)
            .field("components", &self.names())
            .finish()
    }
}

impl Registry {
    /// Create an empty registry resolving APIs with the given prefix
    pub fn new(api_prefix: impl Into<String>) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            api_prefix: api_prefix.into(),
            records: RwLock::new(HashMap::new()),
            last_stamp: Mutex::new(None),
            generation,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, ComponentRecord>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, ComponentRecord>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    /// Full method name for an API, e.g. `SendMail` -> `apiSendMail`
    pub fn api_method_name(&self, api_name: &str) -> String {
        format!("{}{}", self.api_prefix, api_name)
    }

    /// Insert or overwrite a component record and wake dependency waiters.
    pub(crate) fn register(&self, name: &str, instance: Arc<dyn Component>, registered_at: SystemTime) {
        let apis = Arc::clone(&instance).apis();
        log::debug!(
            "Registering component '{}' with {} API method(s)",
            name,
            apis.len()
        );
        let previous = self.write().insert(
            name.to_string(),
            ComponentRecord {
                instance,
                apis,
                registered_at,
            },
        );
        if previous.is_some() {
            log::warn!("Component '{}' was already registered; replaced", name);
        }
        {
            let mut last = self.last_stamp.lock().unwrap_or_else(PoisonError::into_inner);
            if last.is_none_or(|prev| registered_at > prev) {
                *last = Some(registered_at);
            }
        }
        self.generation.send_modify(|generation| *generation += 1);
    }

    /// Remove a component. Returns whether it was registered.
    pub fn unregister(&self, name: &str) -> bool {
        let removed = self.write().remove(name).is_some();
        if removed {
            log::debug!("Unregistered component '{}'", name);
        }
        removed
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Time of the last registration under this name
    pub fn timestamp(&self, name: &str) -> Option<SystemTime> {
        self.read().get(name).map(|record| record.registered_at)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Component>> {
        self.read().get(name).map(|record| Arc::clone(&record.instance))
    }

    pub fn record(&self, name: &str) -> Option<ComponentRecord> {
        self.read().get(name).cloned()
    }

    /// Whether `component_name` is registered and exposes `<prefix><api_name>`
    pub fn has_api(&self, component_name: &str, api_name: &str) -> bool {
        self.resolve_api(component_name, api_name).is_some()
    }

    /// Look up the callable behind an API, cloned out of the lock.
    pub fn resolve_api(&self, component_name: &str, api_name: &str) -> Option<ApiMethod> {
        let method_name = self.api_method_name(api_name);
        self.read()
            .get(component_name)
            .and_then(|record| record.apis.get(&method_name))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// A registration timestamp strictly later than every one handed out or
    /// recorded so far, even when the wall clock has not moved.
    pub fn next_timestamp(&self) -> SystemTime {
        let mut last = self.last_stamp.lock().unwrap_or_else(PoisonError::into_inner);
        let now = SystemTime::now();
        let stamp = match *last {
            Some(prev) if now <= prev => prev + Duration::from_micros(1),
            _ => now,
        };
        *last = Some(stamp);
        stamp
    }

    /// Receiver that changes on every successful registration
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }
}

#[cfg(test)]
mod tests;
