use learnchat_protocol::{EventSink, WidgetEvent};
use parking_lot::Mutex;
use std::sync::Arc;

/// Event sink that keeps every emitted event.
#[derive(Clone, Default)]
pub struct RecordingEventSink {
    events: Arc<Mutex<Vec<WidgetEvent>>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<WidgetEvent> {
        self.events.lock().clone()
    }

    pub fn count(&self, event: &WidgetEvent) -> usize {
        self.events.lock().iter().filter(|seen| *seen == event).count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: WidgetEvent) {
        self.events.lock().push(event);
    }
}
