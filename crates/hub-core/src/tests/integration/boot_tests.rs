use std::sync::{Arc, Mutex};

use serde_json::json;
use tempfile::tempdir;

use crate::config::{ConfigFormat, HubConfig, WaitStrategy};
use crate::event::{EventResult, HubEvent, sync_typed_handler};
use crate::kernel::bootstrap::{BootEntry, Hub};
use crate::kernel::error::HubError;
use crate::tests::fixtures::{Mailer, User};

#[tokio::test]
async fn test_hub_from_config_file() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("hub.json");
    let config = HubConfig::default()
        .with_api_prefix("rpc")
        .with_wait_strategy(WaitStrategy::Poll);
    std::fs::write(&path, config.serialize(ConfigFormat::Json).unwrap()).unwrap();

    let hub = Hub::with_config(HubConfig::from_file(&path).unwrap());
    assert_eq!(hub.config(), &config);

    hub.register(vec![
        BootEntry::new("Mailer", Mailer::with_prefix("rpc")),
        BootEntry::new("User", User::new()).depends_on(["Mailer"]),
    ])
    .await
    .unwrap();

    assert!(hub.has_api("Mailer", "SendMail"));
    assert_eq!(hub.registry().api_prefix(), "rpc");
}

#[tokio::test]
async fn test_hub_with_empty_prefix_falls_back_to_default() {
    let hub = Hub::with_config(HubConfig::default().with_api_prefix(""));
    assert_eq!(hub.config().api_prefix, "api");

    hub.register(vec![BootEntry::new("Mailer", Mailer::new())])
        .await
        .unwrap();
    assert!(hub.has_api("Mailer", "SendMail"));
}

#[tokio::test]
async fn test_full_lifecycle_with_events() {
    let hub = Hub::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let seen_clone = Arc::clone(&seen);
    hub.events().register_type_handler::<HubEvent>(sync_typed_handler(move |event: &HubEvent| {
        seen_clone.lock().unwrap().push(event.clone());
        EventResult::Continue
    }));

    let user = User::new();
    hub.register(vec![
        BootEntry::new("User", user.clone()).depends_on(["Mailer"]),
        BootEntry::new("Mailer", Mailer::new()),
    ])
    .await
    .unwrap();

    let sent = user.create("Jane", "jane@doe.com").await.unwrap();
    assert_eq!(sent["text"], "Welcome to The Jungle!");

    // Once Mailer is gone the same call fails without touching User
    hub.unregister("Mailer");
    let err = user.create("Jane", "jane@doe.com").await.unwrap_err();
    assert!(matches!(err, HubError::ApiNotFound { .. }));
    assert!(hub.is_registered("User"));

    // Booting Mailer again restores the call path
    hub.register(vec![BootEntry::new("Mailer", Mailer::new())])
        .await
        .unwrap();
    assert_eq!(
        hub.api("Mailer", "SendMail", json!({ "email": "jane@doe.com" }))
            .await
            .unwrap()["email"],
        "jane@doe.com"
    );

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            HubEvent::Registered { name: "Mailer".to_string() },
            HubEvent::Registered { name: "User".to_string() },
            HubEvent::Finish { error: None },
            HubEvent::Registered { name: "Mailer".to_string() },
            HubEvent::Finish { error: None },
        ]
    );
}
