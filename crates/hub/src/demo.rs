//! Demo components booted by `hub demo`: a `User` that sends its welcome
//! mail through the `Mailer` component's `SendMail` API.
use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use hub_core::{ApiResult, ApiTable, BootHook, Component, ComponentError, Hub, HubError};
use serde_json::{Value, json};

#[derive(Debug)]
pub struct Mailer {
    api_prefix: String,
    outbox: Mutex<Vec<Value>>,
}

impl Mailer {
    pub fn new(api_prefix: &str) -> Arc<Self> {
        Arc::new(Self {
            api_prefix: api_prefix.to_string(),
            outbox: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> usize {
        self.outbox.lock().map(|outbox| outbox.len()).unwrap_or_default()
    }

    fn send_mail(&self, args: Value) -> ApiResult {
        let email = args
            .get("email")
            .and_then(Value::as_str)
            .ok_or("SendMail requires an 'email' field")?;
        log::info!("Mailer: sending '{}' to {}", args["subject"], email);
        if let Ok(mut outbox) = self.outbox.lock() {
            outbox.push(args.clone());
        }
        Ok(args)
    }
}

#[async_trait]
impl BootHook for Mailer {
    async fn boot(&self, _hub: Hub) -> Result<(), ComponentError> {
        log::debug!("Mailer booted");
        Ok(())
    }
}

impl Component for Mailer {
    fn boot_hook(&self) -> Option<&dyn BootHook> {
        Some(self)
    }

    fn apis(self: Arc<Self>) -> ApiTable {
        let name = format!("{}SendMail", self.api_prefix);
        ApiTable::new().method(name, move |args| {
            let mailer = Arc::clone(&self);
            async move { mailer.send_mail(args) }
        })
    }
}

#[derive(Debug, Default)]
pub struct User {
    hub: OnceLock<Hub>,
}

impl User {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Sends the welcome mail for a new user through the hub.
    pub async fn create(&self, name: &str, email: &str) -> hub_core::Result<Value> {
        let hub = self
            .hub
            .get()
            .ok_or_else(|| HubError::Component("User has not booted".into()))?;
        hub.api(
            "Mailer",
            "SendMail",
            json!({
                "email": email,
                "subject": format!("Hi {}", name),
                "text": "Welcome to The Jungle!",
            }),
        )
        .await
    }
}

#[async_trait]
impl BootHook for User {
    async fn boot(&self, hub: Hub) -> Result<(), ComponentError> {
        // Keep the handle for later API calls.
        let _ = self.hub.set(hub);
        Ok(())
    }
}

impl Component for User {
    fn boot_hook(&self) -> Option<&dyn BootHook> {
        Some(self)
    }
}
