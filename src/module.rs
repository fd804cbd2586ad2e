//! Module contract between the scan host and event handlers.

use serde::Serialize;

use crate::event::Event;

/// Event types a module wants routed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchedEvents {
    /// Wildcard: every event type.
    All,
    /// Only the listed event types.
    Only(Vec<String>),
}

impl WatchedEvents {
    /// Whether an event of this type should be dispatched to the module.
    pub fn accepts(&self, event_type: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(types) => types.iter().any(|t| t == event_type),
        }
    }
}

/// Descriptive metadata shown by the host when selecting modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
}

/// A scan module: receives events from the host, emits derived events
/// through the sink it was constructed with.
pub trait Module: Send {
    /// Module name, stamped on every event it produces.
    fn name(&self) -> &str;

    /// Metadata for module selection.
    fn info(&self) -> ModuleInfo;

    /// Event types the host should route to this module.
    fn watched_events(&self) -> WatchedEvents;

    /// Event types this module may produce.
    fn produced_events(&self) -> &'static [&'static str];

    /// Handle one event. Runs to completion; never fails.
    fn handle_event(&mut self, event: &Event);
}
