use std::time::Duration;

use crate::config::{HubConfig, WaitStrategy};
use crate::kernel::error::{HubError, Result};
use crate::registry::Registry;

/// Blocks one boot attempt until all of its dependencies are registered.
///
/// With no timeout configured the wait never gives up.
#[derive(Debug)]
pub struct DependencyWaiter<'a> {
    registry: &'a Registry,
    strategy: WaitStrategy,
    poll_interval: Duration,
    timeout: Option<Duration>,
}

impl<'a> DependencyWaiter<'a> {
    pub fn new(registry: &'a Registry, config: &HubConfig) -> Self {
        Self {
            registry,
            strategy: config.wait_strategy,
            poll_interval: config.poll_interval(),
            timeout: config.dependency_timeout(),
        }
    }

    /// Number of dependencies currently registered
    pub fn satisfied_count(&self, dependencies: &[String]) -> usize {
        dependencies
            .iter()
            .filter(|dependency| self.registry.is_registered(dependency))
            .count()
    }

    pub fn is_satisfied(&self, dependencies: &[String]) -> bool {
        self.satisfied_count(dependencies) == dependencies.len()
    }

    /// Dependencies not yet registered, in declaration order
    pub fn missing(&self, dependencies: &[String]) -> Vec<String> {
        dependencies
            .iter()
            .filter(|dependency| !self.registry.is_registered(dependency))
            .cloned()
            .collect()
    }

    /// Wait until every dependency of `component` is registered.
    pub async fn wait(&self, component: &str, dependencies: &[String]) -> Result<()> {
        if dependencies.is_empty() {
            return Ok(());
        }
        log::debug!("Component '{}' waiting for {:?}", component, dependencies);

        match self.timeout {
            None => self.wait_until_satisfied(dependencies).await,
            Some(limit) => {
                if tokio::time::timeout(limit, self.wait_until_satisfied(dependencies))
                    .await
                    .is_err()
                {
                    let missing = self.missing(dependencies);
                    log::warn!(
                        "Component '{}' timed out after {:?} waiting for {:?}",
                        component,
                        limit,
                        missing
                    );
                    return Err(HubError::DependencyTimeout {
                        component: component.to_string(),
                        missing,
                        waited: limit,
                    });
                }
            }
        }

        log::debug!("Dependencies of '{}' satisfied", component);
        Ok(())
    }

    async fn wait_until_satisfied(&self, dependencies: &[String]) {
        match self.strategy {
            WaitStrategy::Notify => {
                // Subscribe before the first check so no registration is missed.
                let mut changes = self.registry.subscribe();
                while !self.is_satisfied(dependencies) {
                    if changes.changed().await.is_err() {
                        tokio::time::sleep(self.poll_interval).await;
                    }
                }
            }
            WaitStrategy::Poll => {
                while !self.is_satisfied(dependencies) {
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }
}
