//! Diff computation.

use serde_json::Value;

use crate::diff::model::{ChangeKind, FieldDiff, VersionComparison};
use crate::errors::{ExError, ExErrorKind};
use crate::model::{Payload, Snapshot};

/// Compute the field-level differences from `payload1` to `payload2`.
///
/// Values are compared with full structural equality; nested arrays and
/// objects are not drilled into.
pub fn compute_diff(payload1: &Payload, payload2: &Payload) -> Vec<FieldDiff> {
    let mut differences = Vec::new();

    for (field, new_value) in payload2 {
        match payload1.get(field) {
            None => differences.push(FieldDiff {
                field: field.clone(),
                kind: ChangeKind::Added,
                old: Value::Null,
                new: new_value.clone(),
            }),
            Some(old_value) if old_value != new_value => differences.push(FieldDiff {
                field: field.clone(),
                kind: ChangeKind::Modified,
                old: old_value.clone(),
                new: new_value.clone(),
            }),
            Some(_) => {}
        }
    }

    for (field, old_value) in payload1 {
        if !payload2.contains_key(field) {
            differences.push(FieldDiff {
                field: field.clone(),
                kind: ChangeKind::Removed,
                old: old_value.clone(),
                new: Value::Null,
            });
        }
    }

    differences
}

/// Compare two snapshots of the same entity.
///
/// # Errors
///
/// `InvalidInput` if the snapshots belong to different entities.
pub fn compare_snapshots(
    version1: &Snapshot,
    version2: &Snapshot,
) -> Result<VersionComparison, ExError> {
    if version1.entity != version2.entity {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("compare_snapshots")
            .with_entity(version1.entity)
            .with_message(format!(
                "cannot compare versions of different entities ({} vs {})",
                version1.entity, version2.entity
            )));
    }

    Ok(VersionComparison {
        entity: version1.entity,
        version1: version1.summary(),
        version2: version2.summary(),
        differences: compute_diff(&version1.payload, &version2.payload),
    })
}
