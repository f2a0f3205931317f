use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::entity_ref::EntityRef;

/// Ordered mapping from versioned field name to value.
///
/// Backed by `serde_json::Map` with `preserve_order`, so iteration follows
/// insertion order. Cloning produces a fully independent deep copy.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// How a snapshot came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotOrigin {
    /// Copied from the live entity on save
    Save,
    /// Supplied payload parked as an alternative, never made current on creation
    Draft,
    /// Copied from the live entity after an older payload was written back
    Restore,
}

impl SnapshotOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotOrigin::Save => "save",
            SnapshotOrigin::Draft => "draft",
            SnapshotOrigin::Restore => "restore",
        }
    }
}

impl fmt::Display for SnapshotOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnapshotOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "save" => Ok(SnapshotOrigin::Save),
            "draft" => Ok(SnapshotOrigin::Draft),
            "restore" => Ok(SnapshotOrigin::Restore),
            other => Err(format!("unknown snapshot origin: {}", other)),
        }
    }
}

/// One immutable entry in an entity's version history.
///
/// Only `is_current`, `is_published` and `published_at` ever change after
/// creation, and only through the versioning engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Owning content entity
    pub entity: EntityRef,

    /// Position in the entity's history, starting at 1
    pub version_number: u32,

    /// Versioned fields at creation time
    pub payload: Payload,

    /// User who produced the snapshot, if known
    pub author: Option<String>,

    /// Short description, e.g. "Restored to version 4"
    pub change_summary: String,

    pub change_notes: Option<String>,

    pub origin: SnapshotOrigin,

    /// Exactly one snapshot per entity holds this flag once history exists
    pub is_current: bool,

    /// At most one snapshot per entity holds this flag
    pub is_published: bool,

    /// Last time this snapshot went live; kept after it is unpublished
    pub published_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl Snapshot {
    /// Project to the payload-free shape used in listings and comparisons
    pub fn summary(&self) -> VersionSummary {
        VersionSummary {
            version_number: self.version_number,
            change_summary: self.change_summary.clone(),
            change_notes: self.change_notes.clone(),
            author: self.author.clone(),
            origin: self.origin,
            is_current: self.is_current,
            is_published: self.is_published,
            published_at: self.published_at,
            created_at: self.created_at,
        }
    }

    /// A draft that has not been promoted or published
    pub fn is_parked_draft(&self) -> bool {
        self.origin == SnapshotOrigin::Draft && !self.is_current && !self.is_published
    }
}

/// Input for appending a snapshot; the store assigns number and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSnapshot {
    pub payload: Payload,
    pub author: Option<String>,
    pub change_summary: String,
    pub change_notes: Option<String>,
    pub origin: SnapshotOrigin,
}

/// Snapshot metadata without the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionSummary {
    pub version_number: u32,
    pub change_summary: String,
    pub change_notes: Option<String>,
    pub author: Option<String>,
    pub origin: SnapshotOrigin,
    pub is_current: bool,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
