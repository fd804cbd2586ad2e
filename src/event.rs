//! Events exchanged between modules, and the outbound sink seam.

use std::sync::Arc;
use std::sync::mpsc::Sender;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event type produced by the e-mail module.
pub const EMAILADDR: &str = "EMAILADDR";

/// Event type of the seed event a scan starts from.
pub const ROOT: &str = "ROOT";

// ── Payload ─────────────────────────────────────────────────────────

/// Event payload. Only text is scannable by content modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Text(String),
    Other(serde_json::Value),
}

impl Payload {
    /// The text, if this payload is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Other(_) => None,
        }
    }

    /// Short type name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Other(serde_json::Value::Null) => "null",
            Self::Other(serde_json::Value::Bool(_)) => "bool",
            Self::Other(serde_json::Value::Number(_)) => "number",
            Self::Other(serde_json::Value::String(_)) => "string",
            Self::Other(serde_json::Value::Array(_)) => "array",
            Self::Other(serde_json::Value::Object(_)) => "object",
        }
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Self::Other(value)
    }
}

// ── Event ───────────────────────────────────────────────────────────

/// A discrete unit of discovered information.
///
/// The causal parent is shared, not copied: derived events hold an `Arc`
/// to the same ancestor the host handed out.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    /// Unique event ID.
    pub id: Uuid,
    /// Type tag, e.g. "EMAILADDR".
    pub event_type: String,
    /// Name of the module that produced this event.
    pub module: String,
    /// Event payload.
    pub data: Payload,
    /// Causal parent; `None` only for the scan's root event.
    #[serde(rename = "source_id", serialize_with = "serialize_parent_id")]
    pub source_event: Option<Arc<Event>>,
    /// When the event was created.
    pub generated: DateTime<Utc>,
}

impl Event {
    /// Create an event linked to its causal parent.
    pub fn new(
        event_type: impl Into<String>,
        data: impl Into<Payload>,
        module: impl Into<String>,
        source_event: Option<Arc<Event>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: event_type.into(),
            module: module.into(),
            data: data.into(),
            source_event,
            generated: Utc::now(),
        }
    }

    /// Create the root event of a scan (the target itself, no parent).
    pub fn root(target: impl Into<String>) -> Self {
        let target: String = target.into();
        Self::new(ROOT, target, "", None)
    }

    /// ID of the causal parent, if any.
    pub fn source_id(&self) -> Option<Uuid> {
        self.source_event.as_ref().map(|e| e.id)
    }
}

fn serialize_parent_id<S: serde::Serializer>(
    parent: &Option<Arc<Event>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    parent.as_ref().map(|e| e.id).serialize(serializer)
}

// ── Sink ────────────────────────────────────────────────────────────

/// Outbound seam: where a module hands derived events to the host.
pub trait EventSink: Send {
    /// Deliver a newly produced event.
    fn notify(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn notify(&mut self, event: Event) {
        self.push(event);
    }
}

impl EventSink for Sender<Event> {
    fn notify(&mut self, event: Event) {
        if let Err(e) = self.send(event) {
            tracing::warn!(
                event_type = %e.0.event_type,
                "Event listener disconnected, dropping event"
            );
        }
    }
}
