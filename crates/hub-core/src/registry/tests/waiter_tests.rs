use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::config::{HubConfig, WaitStrategy};
use crate::kernel::error::HubError;
use crate::registry::{DependencyWaiter, Registry};
use crate::tests::fixtures::Mailer;

fn deps(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[tokio::test]
async fn test_empty_dependency_list_is_satisfied() {
    let registry = Registry::new("api");
    let config = HubConfig::default();
    let waiter = DependencyWaiter::new(&registry, &config);

    assert!(waiter.is_satisfied(&[]));
    waiter.wait("Anything", &[]).await.unwrap();
}

#[test]
fn test_counts_and_missing() {
    let registry = Registry::new("api");
    registry.register("A", Mailer::new(), SystemTime::now());
    let config = HubConfig::default();
    let waiter = DependencyWaiter::new(&registry, &config);

    let list = deps(&["A", "B", "C"]);
    assert_eq!(waiter.satisfied_count(&list), 1);
    assert!(!waiter.is_satisfied(&list));
    assert_eq!(waiter.missing(&list), deps(&["B", "C"]));
}

async fn wait_then_register(strategy: WaitStrategy) {
    let registry = Arc::new(Registry::new("api"));
    let config = HubConfig::default()
        .with_wait_strategy(strategy)
        .with_poll_interval(Duration::from_millis(5));

    let waiting = {
        let registry = Arc::clone(&registry);
        let config = config.clone();
        tokio::spawn(async move {
            DependencyWaiter::new(&registry, &config)
                .wait("User", &deps(&["A", "B"]))
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(15)).await;
    assert!(!waiting.is_finished());

    registry.register("A", Mailer::new(), SystemTime::now());
    tokio::time::sleep(Duration::from_millis(15)).await;
    assert!(!waiting.is_finished(), "One of two dependencies is not enough");

    registry.register("B", Mailer::new(), SystemTime::now());
    tokio::time::timeout(Duration::from_secs(1), waiting)
        .await
        .expect("waiter should finish once both are registered")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_notify_strategy_wakes_on_registration() {
    wait_then_register(WaitStrategy::Notify).await;
}

#[tokio::test]
async fn test_poll_strategy_wakes_on_registration() {
    wait_then_register(WaitStrategy::Poll).await;
}

#[tokio::test(start_paused = true)]
async fn test_timeout_reports_missing() {
    let registry = Registry::new("api");
    registry.register("A", Mailer::new(), SystemTime::now());
    let config = HubConfig::default().with_dependency_timeout(Duration::from_secs(5));

    let err = DependencyWaiter::new(&registry, &config)
        .wait("User", &deps(&["A", "Ghost"]))
        .await
        .unwrap_err();

    match err {
        HubError::DependencyTimeout { component, missing, waited } => {
            assert_eq!(component, "User");
            assert_eq!(missing, deps(&["Ghost"]));
            assert_eq!(waited, Duration::from_secs(5));
        }
        other => panic!("Expected DependencyTimeout, got {:?}", other),
    }
}
