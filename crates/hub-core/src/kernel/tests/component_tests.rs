use std::sync::Arc;

use serde_json::json;

use crate::kernel::component::{ApiTable, Component};
use crate::tests::fixtures::{Inert, Mailer};

#[test]
fn test_api_table_builder() {
    let table = ApiTable::new()
        .method("apiB", |args| async move { Ok(args) })
        .method("apiA", |_args| async { Ok(json!(null)) });

    assert_eq!(table.len(), 2);
    assert!(!table.is_empty());
    assert!(table.contains("apiA"));
    assert!(!table.contains("A"), "Lookup uses the full method name");
    assert_eq!(table.names(), vec!["apiA", "apiB"]);
    assert!(format!("{:?}", table).contains("apiA"));
}

#[test]
fn test_api_table_replaces_same_name() {
    let table = ApiTable::new()
        .method("apiEcho", |_args| async { Ok(json!(1)) })
        .method("apiEcho", |_args| async { Ok(json!(2)) });
    assert_eq!(table.len(), 1);
}

#[tokio::test]
async fn test_api_method_runs_against_instance() {
    let mailer = Mailer::new();
    let table = Arc::clone(&mailer).apis();
    let method = table.get("apiSendMail").expect("Mailer exposes apiSendMail");

    let payload = json!({ "email": "john@doe.com", "subject": "Hi", "text": "hello" });
    let result = method(payload.clone()).await.expect("send should succeed");

    assert_eq!(result, payload);
    assert_eq!(mailer.sent.lock().unwrap().len(), 1, "Method must mutate the captured instance");
}

#[test]
fn test_component_defaults() {
    let inert = Arc::new(Inert);
    assert!(inert.boot_hook().is_none());
    assert!(inert.apis().contains("apiPing"));

    let mailer = Mailer::new();
    assert!(mailer.boot_hook().is_some());
}
