//! Snapshot write operations.
//!
//! Every function here takes the caller's `Transaction`. The engine opens
//! it with `TransactionBehavior::Immediate`, so reading the highest version
//! number and inserting the next one cannot interleave with another writer.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, serialization, Result};
use crate::snapshot::row::from_millis;
use chrono::{DateTime, Utc};
use folio_core::errors::{ContentError, ExError, ExErrorKind};
use folio_core::model::{EntityRef, NewSnapshot, Snapshot};
use rusqlite::Transaction;

/// Append a snapshot as the next version of `entity`.
///
/// The new row holds neither flag; callers flip flags afterwards.
///
/// ## Errors
///
/// - `ExErrorKind::ConcurrentModification`: another writer took the number
/// - `ExErrorKind::Serialization`: payload could not be encoded
/// - `ExErrorKind::Persistence`: database insert failed
pub fn append(tx: &Transaction, entity: EntityRef, new: NewSnapshot) -> Result<Snapshot> {
    let last: i64 = tx
        .query_row(
            "SELECT COALESCE(MAX(version_number), 0) FROM content_versions
             WHERE entity_kind = ?1 AND entity_id = ?2",
            rusqlite::params![entity.kind.tag(), entity.id],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)?;
    let version_number = u32::try_from(last + 1).map_err(|_| {
        ExError::new(ExErrorKind::ConstraintViolation)
            .with_op("append_snapshot")
            .with_entity(entity)
            .with_message("version number space exhausted")
    })?;

    let payload_json =
        serde_json::to_string(&new.payload).map_err(|e| serialization("append_snapshot", e))?;
    let created_at = from_millis(Utc::now().timestamp_millis())?;

    tx.execute(
        r#"
        INSERT INTO content_versions (
            entity_kind,
            entity_id,
            version_number,
            payload,
            author,
            change_summary,
            change_notes,
            origin,
            is_current,
            is_published,
            published_at,
            created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, 0, NULL, ?9)
        "#,
        rusqlite::params![
            entity.kind.tag(),
            entity.id,
            version_number,
            payload_json,
            new.author,
            new.change_summary,
            new.change_notes,
            new.origin.as_str(),
            created_at.timestamp_millis(),
        ],
    )
    .map_err(from_rusqlite)?;

    tracing::debug!(
        entity = %entity,
        version_number = version_number,
        origin = new.origin.as_str(),
        "Appended snapshot"
    );

    Ok(Snapshot {
        entity,
        version_number,
        payload: new.payload,
        author: new.author,
        change_summary: new.change_summary,
        change_notes: new.change_notes,
        origin: new.origin,
        is_current: false,
        is_published: false,
        published_at: None,
        created_at,
    })
}

/// Make `version_number` the only current snapshot of `entity`.
///
/// ## Errors
///
/// - `ExErrorKind::NotFound`: no such version
pub fn set_current(tx: &Transaction, entity: EntityRef, version_number: u32) -> Result<()> {
    ensure_exists(tx, entity, version_number)?;

    tx.execute(
        "UPDATE content_versions SET is_current = 0
         WHERE entity_kind = ?1 AND entity_id = ?2 AND is_current = 1 AND version_number <> ?3",
        rusqlite::params![entity.kind.tag(), entity.id, version_number],
    )
    .map_err(from_rusqlite)?;

    tx.execute(
        "UPDATE content_versions SET is_current = 1
         WHERE entity_kind = ?1 AND entity_id = ?2 AND version_number = ?3",
        rusqlite::params![entity.kind.tag(), entity.id, version_number],
    )
    .map_err(from_rusqlite)?;

    tracing::debug!(entity = %entity, version_number = version_number, "Set current version");

    Ok(())
}

/// Move the published flag to `version_number`, or clear it with `None`.
///
/// `published_at` is stamped with `now` only when the target goes from
/// unpublished to published. The previous holder keeps its timestamp.
///
/// ## Errors
///
/// - `ExErrorKind::NotFound`: no such version
pub fn set_published(
    tx: &Transaction,
    entity: EntityRef,
    version_number: Option<u32>,
    now: DateTime<Utc>,
) -> Result<()> {
    if let Some(n) = version_number {
        ensure_exists(tx, entity, n)?;
    }

    // Version 0 never exists, so `None` clears every holder.
    let keep = version_number.unwrap_or(0);
    tx.execute(
        "UPDATE content_versions SET is_published = 0
         WHERE entity_kind = ?1 AND entity_id = ?2 AND is_published = 1 AND version_number <> ?3",
        rusqlite::params![entity.kind.tag(), entity.id, keep],
    )
    .map_err(from_rusqlite)?;

    if let Some(n) = version_number {
        tx.execute(
            "UPDATE content_versions
             SET published_at = CASE WHEN is_published = 0 THEN ?4 ELSE published_at END,
                 is_published = 1
             WHERE entity_kind = ?1 AND entity_id = ?2 AND version_number = ?3",
            rusqlite::params![entity.kind.tag(), entity.id, n, now.timestamp_millis()],
        )
        .map_err(from_rusqlite)?;
    }

    tracing::debug!(entity = %entity, version_number = ?version_number, "Set published version");

    Ok(())
}

fn ensure_exists(tx: &Transaction, entity: EntityRef, version_number: u32) -> Result<()> {
    let exists: bool = tx
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM content_versions
             WHERE entity_kind = ?1 AND entity_id = ?2 AND version_number = ?3)",
            rusqlite::params![entity.kind.tag(), entity.id, version_number],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)?;

    if exists {
        Ok(())
    } else {
        Err(ContentError::VersionNotFound {
            entity,
            version_number,
        }
        .into())
    }
}
