use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use serde_json::Value;
use tokio::task::JoinSet;

use crate::config::HubConfig;
use crate::event::{EventDispatcher, HubEvent};
use crate::kernel::component::Component;
use crate::kernel::constants;
use crate::kernel::error::{HubError, Result};
use crate::registry::{DependencyWaiter, Registry};

/// One entry of a boot batch: a name, an instance and optional dependencies.
#[derive(Clone, Debug)]
pub struct BootEntry {
    name: String,
    instance: Option<Arc<dyn Component>>,
    dependencies: Option<Vec<String>>,
}

impl BootEntry {
    pub fn new(name: impl Into<String>, instance: Arc<dyn Component>) -> Self {
        Self {
            name: name.into(),
            instance: Some(instance),
            dependencies: None,
        }
    }

    /// An entry without an instance. Registering it fails validation.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instance: None,
            dependencies: None,
        }
    }

    pub fn depends_on<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = Some(dependencies.into_iter().map(Into::into).collect());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependencies(&self) -> &[String] {
        self.dependencies.as_deref().unwrap_or_default()
    }

    fn validate(self, position: usize) -> Result<ValidEntry> {
        if self.name.is_empty() {
            return Err(HubError::InvalidComponentName { position });
        }
        let Some(instance) = self.instance else {
            return Err(HubError::InvalidComponentInstance { name: self.name });
        };
        Ok(ValidEntry {
            name: self.name,
            instance,
            dependencies: self.dependencies.unwrap_or_default(),
        })
    }
}

struct ValidEntry {
    name: String,
    instance: Arc<dyn Component>,
    dependencies: Vec<String>,
}

struct HubInner {
    config: HubConfig,
    registry: Registry,
    events: EventDispatcher,
}

/// Handle to a component hub.
///
/// Cloning is cheap; every clone refers to the same registry. Boot hooks
/// receive a clone so components can call their peers later.
#[derive(Clone)]
pub struct Hub {
    inner: Arc<HubInner>,
}

impl fmt::Debug for Hub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hub")
            .field("config", &self.inner.config)
            .field("registry", &self.inner.registry)
            .finish_non_exhaustive()
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

impl Hub {
    /// Creates a hub with the default configuration (`api` prefix).
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    pub fn with_config(config: HubConfig) -> Self {
        let config = config.normalized();
        log::info!(
            "Initializing {} v{} (api prefix '{}', {:?} wait)",
            constants::APP_NAME,
            constants::APP_VERSION,
            config.api_prefix,
            config.wait_strategy
        );
        let registry = Registry::new(config.api_prefix.clone());
        Self {
            inner: Arc::new(HubInner {
                config,
                registry,
                events: EventDispatcher::new(),
            }),
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// Dispatcher for `component.registered` and `batch.finish`
    pub fn events(&self) -> &EventDispatcher {
        &self.inner.events
    }

    /// Boot a batch of components.
    ///
    /// Every entry is validated before any boot attempt starts, so one invalid
    /// entry fails the call and none of its siblings boot. Valid entries then
    /// boot concurrently, each once its dependencies are registered. Returns
    /// the first error in completion order; attempts still in flight at that
    /// point keep running, and a dependent of the failed entry keeps waiting
    /// until its dependency registers or the configured dependency timeout
    /// elapses. `None` or an empty batch succeeds.
    pub async fn register(&self, batch: impl Into<Option<Vec<BootEntry>>>) -> Result<()> {
        let outcome = self.boot_batch(batch.into().unwrap_or_default()).await;
        let error = outcome.as_ref().err().map(ToString::to_string);
        self.inner.events.dispatch(&HubEvent::Finish { error }).await;
        outcome
    }

    async fn boot_batch(&self, batch: Vec<BootEntry>) -> Result<()> {
        let entries = batch
            .into_iter()
            .enumerate()
            .map(|(position, entry)| entry.validate(position))
            .collect::<Result<Vec<_>>>()?;
        if entries.is_empty() {
            return Ok(());
        }
        log::info!("Booting batch of {} component(s)", entries.len());

        let mut attempts = JoinSet::new();
        for entry in entries {
            let hub = self.clone();
            attempts.spawn(async move { hub.boot_component(entry).await });
        }

        while let Some(joined) = attempts.join_next().await {
            let outcome = joined
                .map_err(|e| HubError::BootAborted { reason: e.to_string() })
                .and_then(|attempt| attempt);
            if let Err(err) = outcome {
                log::error!("Boot batch failed: {}", err);
                attempts.detach_all();
                return Err(err);
            }
        }
        Ok(())
    }

    async fn boot_component(&self, entry: ValidEntry) -> Result<()> {
        let ValidEntry {
            name,
            instance,
            dependencies,
        } = entry;

        DependencyWaiter::new(&self.inner.registry, &self.inner.config)
            .wait(&name, &dependencies)
            .await?;

        let Some(hook) = instance.boot_hook() else {
            log::debug!("Component '{}' has no boot hook; not registering", name);
            return Ok(());
        };
        hook.boot(self.clone()).await.map_err(|e| {
            log::warn!("Boot hook of component '{}' failed: {}", name, e);
            HubError::Component(e)
        })?;

        let registered_at = self.inner.registry.next_timestamp();
        self.inner
            .registry
            .register(&name, Arc::clone(&instance), registered_at);
        log::info!("Component '{}' registered", name);
        self.inner.events.dispatch(&HubEvent::Registered { name }).await;
        Ok(())
    }

    /// Remove a component. Unknown names are ignored.
    pub fn unregister(&self, name: &str) {
        self.inner.registry.unregister(name);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.inner.registry.is_registered(name)
    }

    pub fn timestamp(&self, name: &str) -> Option<SystemTime> {
        self.inner.registry.timestamp(name)
    }

    pub fn has_api(&self, component_name: &str, api_name: &str) -> bool {
        self.inner.registry.has_api(component_name, api_name)
    }

    /// Call `<prefix><api_name>` on a registered component with `args`.
    ///
    /// The method's result or error is returned unchanged.
    pub async fn api(&self, component_name: &str, api_name: &str, args: Value) -> Result<Value> {
        let Some(method) = self.inner.registry.resolve_api(component_name, api_name) else {
            log::debug!("API '{}' not found on '{}'", api_name, component_name);
            return Err(HubError::ApiNotFound {
                component: component_name.to_string(),
                api: api_name.to_string(),
            });
        };
        method(args).await.map_err(HubError::Component)
    }
}
