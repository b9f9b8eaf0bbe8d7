use std::fmt;

use crate::frame::Frame;

/// Externally visible viewer actions, one variant per action class.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A hotspot was clicked and its link opened.
    Activate,
    /// The link configuration was replaced.
    ConfigLoaded,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Activate => f.write_str("activate"),
            EventKind::ConfigLoaded => f.write_str("config-loaded"),
        }
    }
}

/// One recorded action, stamped with the frame it happened on.
///
/// Tests assert on this log instead of scraping console output, and the web
/// host can drain it for its own diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub frame_index: u64,
    pub kind: EventKind,
    pub detail: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, frame: Frame, kind: EventKind, detail: impl Into<String>) {
        self.events.push(Event {
            frame_index: frame.index,
            kind,
            detail: detail.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Hands the pending log to the caller and starts a fresh one.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::{EventBus, EventKind};
    use crate::frame::Frame;

    #[test]
    fn stamps_events_with_the_emitting_frame() {
        let mut bus = EventBus::new();
        bus.emit(
            Frame::new(2, 0.1),
            EventKind::Activate,
            "https://example.invalid/a",
        );

        let events = bus.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].frame_index, 2);
        assert_eq!(events[0].kind, EventKind::Activate);
        assert_eq!(events[0].detail, "https://example.invalid/a");
    }

    #[test]
    fn drain_leaves_an_empty_log() {
        let mut bus = EventBus::new();
        bus.emit(Frame::new(0, 1.0), EventKind::ConfigLoaded, "8 links");
        bus.emit(Frame::new(1, 1.0), EventKind::Activate, "url");

        assert_eq!(bus.drain().len(), 2);
        assert!(bus.events().is_empty());
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn kinds_render_as_stable_tags() {
        assert_eq!(EventKind::Activate.to_string(), "activate");
        assert_eq!(EventKind::ConfigLoaded.to_string(), "config-loaded");
    }
}
