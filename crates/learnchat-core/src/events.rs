//! Broadcast event bus for front-ends driving the widget.

use learnchat_protocol::{EventSink, WidgetEvent};
use log::debug;
use tokio::sync::broadcast;

/// Broadcast-backed event bus; each subscriber sees every event emitted
/// after it subscribed.
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<WidgetEvent>,
}

impl EventBus {
    /// Create a new event bus with the given channel buffer size.
    pub fn new(buffer: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer);
        debug!("widget event bus initialized (buffer={})", buffer);
        Self { sender }
    }

    /// Subscribe to the event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.sender.subscribe()
    }
}

impl EventSink for EventBus {
    /// Emit an event into the broadcast channel; dropped when nobody listens.
    fn emit(&self, event: WidgetEvent) {
        let _ = self.sender.send(event);
    }
}
