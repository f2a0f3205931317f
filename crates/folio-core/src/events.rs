//! Version change notifications.
//!
//! The engine emits a [`VersionEvent`] after each committed flag change so
//! downstream layers (page caches, search indexes) can invalidate what they
//! hold for the entity. Sinks run after the transaction, never inside it.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::model::EntityRef;

/// A committed change to an entity's version flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum VersionEvent {
    /// `version_number` now holds the current flag
    CurrentChanged {
        entity: EntityRef,
        version_number: u32,
    },
    /// Published flag moved; `None` means nothing is live any more
    PublishedChanged {
        entity: EntityRef,
        version_number: Option<u32>,
    },
    /// A draft was parked without touching either flag
    DraftCreated {
        entity: EntityRef,
        version_number: u32,
    },
}

impl VersionEvent {
    pub fn entity(&self) -> EntityRef {
        match self {
            VersionEvent::CurrentChanged { entity, .. }
            | VersionEvent::PublishedChanged { entity, .. }
            | VersionEvent::DraftCreated { entity, .. } => *entity,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VersionEvent::CurrentChanged { .. } => "current_changed",
            VersionEvent::PublishedChanged { .. } => "published_changed",
            VersionEvent::DraftCreated { .. } => "draft_created",
        }
    }
}

/// Receiver for committed version changes.
pub trait VersionEventSink: Send + Sync {
    fn notify(&self, event: &VersionEvent);
}

/// Sink that drops every event. Default when nothing downstream listens.
pub struct NoopVersionEventSink;

impl VersionEventSink for NoopVersionEventSink {
    fn notify(&self, _: &VersionEvent) {}
}

/// Sink that keeps every event in memory, in emission order.
#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<VersionEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<VersionEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn clear(&self) {
        match self.events.lock() {
            Ok(mut guard) => guard.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl VersionEventSink for RecordingEventSink {
    fn notify(&self, event: &VersionEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_sink_accepts_events() {
        let sink = NoopVersionEventSink;
        sink.notify(&VersionEvent::DraftCreated {
            entity: EntityRef::article(1).unwrap(),
            version_number: 2,
        });
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let entity = EntityRef::portfolio_item(4).unwrap();
        let sink = RecordingEventSink::new();
        sink.notify(&VersionEvent::CurrentChanged {
            entity,
            version_number: 1,
        });
        sink.notify(&VersionEvent::PublishedChanged {
            entity,
            version_number: None,
        });

        let names: Vec<&str> = sink.events().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["current_changed", "published_changed"]);
        assert_eq!(sink.events()[1].entity(), entity);

        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let event = VersionEvent::PublishedChanged {
            entity: EntityRef::service(3).unwrap(),
            version_number: Some(5),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "published_changed");
        assert_eq!(json["version_number"], 5);
    }
}
