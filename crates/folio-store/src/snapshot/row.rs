//! Row decoding shared by the snapshot queries

#![allow(clippy::result_large_err)]

use crate::errors::{serialization, Result};
use chrono::{DateTime, TimeZone, Utc};
use folio_core::errors::{ExError, ExErrorKind};
use folio_core::model::{EntityKind, EntityRef, Payload, Snapshot, SnapshotOrigin};
use rusqlite::Row;

pub(crate) const SNAPSHOT_COLUMNS: &str = "entity_kind, entity_id, version_number, payload, author, \
     change_summary, change_notes, origin, is_current, is_published, published_at, created_at";

/// Raw column values, decoded into a `Snapshot` outside the rusqlite closure
pub(crate) struct SnapshotRow {
    entity_kind: String,
    entity_id: i64,
    version_number: i64,
    payload: String,
    author: Option<String>,
    change_summary: String,
    change_notes: Option<String>,
    origin: String,
    is_current: bool,
    is_published: bool,
    published_at: Option<i64>,
    created_at: i64,
}

impl SnapshotRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            entity_kind: row.get(0)?,
            entity_id: row.get(1)?,
            version_number: row.get(2)?,
            payload: row.get(3)?,
            author: row.get(4)?,
            change_summary: row.get(5)?,
            change_notes: row.get(6)?,
            origin: row.get(7)?,
            is_current: row.get::<_, i64>(8)? != 0,
            is_published: row.get::<_, i64>(9)? != 0,
            published_at: row.get(10)?,
            created_at: row.get(11)?,
        })
    }

    pub(crate) fn into_snapshot(self) -> Result<Snapshot> {
        let kind: EntityKind = self.entity_kind.parse().map_err(ExError::from)?;
        let entity = EntityRef::new(kind, self.entity_id)?;
        let version_number = u32::try_from(self.version_number).map_err(|_| {
            corrupt(format!("version number out of range: {}", self.version_number))
        })?;
        let payload: Payload = serde_json::from_str(&self.payload)
            .map_err(|e| serialization("decode_snapshot", e))?;
        let origin: SnapshotOrigin = self.origin.parse().map_err(corrupt)?;

        Ok(Snapshot {
            entity,
            version_number,
            payload,
            author: self.author,
            change_summary: self.change_summary,
            change_notes: self.change_notes,
            origin,
            is_current: self.is_current,
            is_published: self.is_published,
            published_at: self.published_at.map(from_millis).transpose()?,
            created_at: from_millis(self.created_at)?,
        })
    }
}

pub(crate) fn from_millis(ms: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| corrupt(format!("timestamp out of range: {}", ms)))
}

fn corrupt(message: String) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("decode_snapshot")
        .with_message(message)
}
