//! Diff output types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{EntityRef, VersionSummary};

/// What happened to a field between two payloads.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Present only in the second payload
    Added,
    /// Present in both with structurally different values
    Modified,
    /// Present only in the first payload
    Removed,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Removed => "removed",
        }
    }
}

/// One top-level field difference.
///
/// `old` is `null` for added fields, `new` is `null` for removed ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDiff {
    pub field: String,
    pub kind: ChangeKind,
    pub old: Value,
    pub new: Value,
}

/// Result of comparing two versions of the same entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VersionComparison {
    pub entity: EntityRef,
    pub version1: VersionSummary,
    pub version2: VersionSummary,
    pub differences: Vec<FieldDiff>,
}

impl VersionComparison {
    pub fn is_identical(&self) -> bool {
        self.differences.is_empty()
    }

    pub fn count(&self, kind: ChangeKind) -> usize {
        self.differences.iter().filter(|d| d.kind == kind).count()
    }
}
