use std::any::Any;

use crate::event::Event;
use crate::kernel::constants::{EVENT_FINISH, EVENT_REGISTERED};

/// Signals emitted by the hub
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubEvent {
    /// A component finished booting and is now in the registry
    Registered { name: String },
    /// A `register` call completed; carries the error message if it failed
    Finish { error: Option<String> },
}

impl HubEvent {
    pub const REGISTERED: &'static str = EVENT_REGISTERED;
    pub const FINISH: &'static str = EVENT_FINISH;
}

impl Event for HubEvent {
    fn name(&self) -> &'static str {
        match self {
            HubEvent::Registered { .. } => Self::REGISTERED,
            HubEvent::Finish { .. } => Self::FINISH,
        }
    }

    fn clone_event(&self) -> Box<dyn Event> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
