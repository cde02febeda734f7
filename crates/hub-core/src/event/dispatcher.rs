use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::event::{AsyncEventHandler, Event, EventId, EventResult};

/// Owned future produced by a handler
pub type HandlerFuture = Pin<Box<dyn Future<Output = EventResult> + Send + 'static>>;

/// Handler for events with a given name
pub type HandlerFn = Box<dyn Fn(&dyn Event) -> HandlerFuture + Send + Sync>;

type SharedHandler = Arc<dyn AsyncEventHandler>;

/// Simple handler for events with a specific name (Internal Helper)
struct SimpleHandler {
    handler: HandlerFn,
}

#[async_trait]
impl AsyncEventHandler for SimpleHandler {
    async fn handle(&self, event: &dyn Event) -> EventResult {
        (self.handler)(event).await
    }
}

/// Handler for typed events that will check the type (Internal Helper)
struct TypedEventHandler<E: Event + 'static> {
    handler: Box<dyn Fn(&E) -> HandlerFuture + Send + Sync>,
}

#[async_trait]
impl<E: Event + 'static> AsyncEventHandler for TypedEventHandler<E> {
    async fn handle(&self, event: &dyn Event) -> EventResult {
        if let Some(e) = event.as_any().downcast_ref::<E>() {
            (self.handler)(e).await
        } else {
            EventResult::Continue
        }
    }
}

#[derive(Default)]
struct HandlerTable {
    handlers: HashMap<&'static str, Vec<(EventId, SharedHandler)>>,
    type_handlers: HashMap<TypeId, Vec<(EventId, SharedHandler)>>,
    next_handler_id: EventId,
}

impl HandlerTable {
    fn next_id(&mut self) -> EventId {
        self.next_handler_id += 1;
        self.next_handler_id
    }
}

/// Thread-safe, cloneable event dispatcher.
///
/// Handlers are snapshotted before dispatch, so a handler may register
/// further handlers or trigger another dispatch without deadlocking.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    table: Arc<Mutex<HandlerTable>>,
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handler_count", &self.handler_count())
            .finish()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HandlerTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a handler for events with the given name
    pub fn register_handler(&self, event_name: &'static str, handler: HandlerFn) -> EventId {
        let mut table = self.lock();
        let id = table.next_id();
        let handler: SharedHandler = Arc::new(SimpleHandler { handler });
        table.handlers.entry(event_name).or_default().push((id, handler));
        id
    }

    /// Register a handler for every event of concrete type `E`
    pub fn register_type_handler<E: Event + 'static>(
        &self,
        handler: Box<dyn Fn(&E) -> HandlerFuture + Send + Sync>,
    ) -> EventId {
        let mut table = self.lock();
        let id = table.next_id();
        let handler: SharedHandler = Arc::new(TypedEventHandler::<E> { handler });
        table
            .type_handlers
            .entry(TypeId::of::<E>())
            .or_default()
            .push((id, handler));
        id
    }

    /// Remove a handler; returns whether it was registered
    pub fn unregister_handler(&self, id: EventId) -> bool {
        let mut guard = self.lock();
        let table = &mut *guard;
        let mut found = false;
        for handlers in table.handlers.values_mut().chain(table.type_handlers.values_mut()) {
            let len_before = handlers.len();
            handlers.retain(|(h_id, _)| *h_id != id);
            found |= handlers.len() < len_before;
        }
        found
    }

    pub fn handler_count(&self) -> usize {
        let table = self.lock();
        table.handlers.values().map(Vec::len).sum::<usize>()
            + table.type_handlers.values().map(Vec::len).sum::<usize>()
    }

    /// Dispatch an event: name handlers first, then type handlers, stopping
    /// at the first handler that returns [`EventResult::Stop`].
    pub async fn dispatch(&self, event: &dyn Event) -> EventResult {
        let snapshot: Vec<SharedHandler> = {
            let table = self.lock();
            let by_name = table.handlers.get(event.name()).into_iter().flatten();
            let by_type = table
                .type_handlers
                .get(&event.as_any().type_id())
                .into_iter()
                .flatten();
            by_name.chain(by_type).map(|(_, h)| Arc::clone(h)).collect()
        };

        for handler in snapshot {
            if handler.handle(event).await == EventResult::Stop {
                log::debug!("Propagation of event '{}' stopped by handler", event.name());
                return EventResult::Stop;
            }
        }
        EventResult::Continue
    }
}

//--------------------------------------------------
// Helper Functions
//--------------------------------------------------

/// Helper function to create synchronous handlers that are compatible with async system
pub fn sync_event_handler<F>(f: F) -> HandlerFn
where
    F: Fn(&dyn Event) -> EventResult + Send + Sync + 'static,
{
    Box::new(move |event: &dyn Event| -> HandlerFuture {
        let result = f(event);
        Box::pin(async move { result })
    })
}

/// Helper function to create typed synchronous handlers
pub fn sync_typed_handler<E, F>(f: F) -> Box<dyn Fn(&E) -> HandlerFuture + Send + Sync>
where
    E: Event + 'static,
    F: Fn(&E) -> EventResult + Send + Sync + 'static,
{
    Box::new(move |event: &E| -> HandlerFuture {
        let result = f(event);
        Box::pin(async move { result })
    })
}
