//! Folio Core - content versioning kernel
//!
//! This crate provides the type-agnostic building blocks of content
//! versioning for the Folio admin:
//! - Entity references and the snapshot (content version) model
//! - Live content entities (articles, portfolio items, services)
//! - Content adapters mapping live entities to and from snapshot payloads
//! - The field-level diff engine
//! - Version change notifications for downstream cache layers
//! - Error and logging facilities shared by the store and engine crates

pub mod content;
pub mod diff;
pub mod errors;
pub mod events;
pub mod logging_facility;
pub mod model;

// Used by the logging macros so callers don't need a direct dependency.
pub use folio_core_types as core_types;

// Re-export commonly used types
pub use content::{AdapterRegistry, ContentAdapter};
pub use errors::{ContentError, ExError, ExErrorKind, Result};
pub use events::{NoopVersionEventSink, RecordingEventSink, VersionEvent, VersionEventSink};
pub use model::{
    ContentEntity, EntityKind, EntityRef, NewSnapshot, Payload, Snapshot, SnapshotOrigin,
    VersionSummary,
};
