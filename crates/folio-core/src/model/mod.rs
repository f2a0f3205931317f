pub mod content;
pub mod entity_ref;
pub mod snapshot;

pub use content::{Article, ContentEntity, PortfolioItem, Service};
pub use entity_ref::{EntityKind, EntityRef};
pub use snapshot::{NewSnapshot, Payload, Snapshot, SnapshotOrigin, VersionSummary};
