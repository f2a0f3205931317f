//! Snapshot read operations. Every call is a fresh read.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use crate::snapshot::row::{SnapshotRow, SNAPSHOT_COLUMNS};
use folio_core::model::{EntityRef, Snapshot};
use rusqlite::{Connection, OptionalExtension};

/// Paging for history listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Maximum number of snapshots; `None` returns the whole history
    pub limit: Option<u32>,
    pub offset: u32,
}

impl ListOptions {
    pub fn page(limit: u32, offset: u32) -> Self {
        Self {
            limit: Some(limit),
            offset,
        }
    }
}

/// History of `entity`, newest first
pub fn list_by_entity(
    conn: &Connection,
    entity: EntityRef,
    options: ListOptions,
) -> Result<Vec<Snapshot>> {
    // SQLite treats a negative LIMIT as unbounded
    let limit: i64 = options.limit.map(i64::from).unwrap_or(-1);

    let sql = format!(
        "SELECT {} FROM content_versions
         WHERE entity_kind = ?1 AND entity_id = ?2
         ORDER BY version_number DESC
         LIMIT ?3 OFFSET ?4",
        SNAPSHOT_COLUMNS
    );
    let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
    let rows = stmt
        .query_map(
            rusqlite::params![entity.kind.tag(), entity.id, limit, options.offset],
            SnapshotRow::from_row,
        )
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    rows.into_iter().map(SnapshotRow::into_snapshot).collect()
}

/// Total number of snapshots of `entity`
pub fn count_by_entity(conn: &Connection, entity: EntityRef) -> Result<u64> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM content_versions WHERE entity_kind = ?1 AND entity_id = ?2",
            rusqlite::params![entity.kind.tag(), entity.id],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)?;
    Ok(count.max(0) as u64)
}

/// A single version of `entity`
pub fn find(conn: &Connection, entity: EntityRef, version_number: u32) -> Result<Option<Snapshot>> {
    query_one(
        conn,
        "AND version_number = ?3",
        rusqlite::params![entity.kind.tag(), entity.id, version_number],
    )
}

/// The snapshot holding the current flag, if any history exists
pub fn current(conn: &Connection, entity: EntityRef) -> Result<Option<Snapshot>> {
    query_one(
        conn,
        "AND is_current = 1",
        rusqlite::params![entity.kind.tag(), entity.id],
    )
}

/// The live snapshot; `None` when never published or unpublished
pub fn published(conn: &Connection, entity: EntityRef) -> Result<Option<Snapshot>> {
    query_one(
        conn,
        "AND is_published = 1",
        rusqlite::params![entity.kind.tag(), entity.id],
    )
}

fn query_one<P: rusqlite::Params>(
    conn: &Connection,
    filter: &str,
    params: P,
) -> Result<Option<Snapshot>> {
    let sql = format!(
        "SELECT {} FROM content_versions WHERE entity_kind = ?1 AND entity_id = ?2 {}",
        SNAPSHOT_COLUMNS, filter
    );
    let row = conn
        .query_row(&sql, params, SnapshotRow::from_row)
        .optional()
        .map_err(from_rusqlite)?;

    row.map(SnapshotRow::into_snapshot).transpose()
}
