//! Render events emitted by the chat widget.

use serde::{Deserialize, Serialize};

/// State change a front-end should react to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "payload")]
pub enum WidgetEvent {
    /// The panel was opened (`true`) or closed.
    PanelToggled(bool),
    /// The conversation history changed; carries the new length.
    HistoryChanged { len: usize },
    /// The view should follow the newest message.
    ScrollToLatest,
    /// A send started (`true`) or finished.
    SendingChanged(bool),
    /// The typing indicator appeared (`true`) or disappeared.
    TypingChanged(bool),
    /// A context rebuild finished and was applied.
    ContextUpdated { generation: u64 },
    /// Non-blocking informational message.
    Notice(String),
}

/// Sink interface for widget events.
pub trait EventSink: Send + Sync {
    /// Emit an event to downstream listeners.
    fn emit(&self, event: WidgetEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn emit(&self, _event: WidgetEvent) {}
}
