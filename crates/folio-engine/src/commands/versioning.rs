//! Versioning operations.
//!
//! Each write runs in one IMMEDIATE transaction: load, append, flip flags,
//! commit. A `ConcurrentModification` failure rolls the transaction back and
//! the whole unit is retried up to `EngineConfig::max_retries` times.
//! Version events are emitted only after a successful commit.

#![allow(clippy::result_large_err)]

use std::time::{Duration, Instant};

use chrono::Utc;
use folio_core::diff::{compare_snapshots, VersionComparison};
use folio_core::errors::{ContentError, ExError};
use folio_core::events::VersionEvent;
use folio_core::model::{
    ContentEntity, EntityRef, NewSnapshot, Payload, Snapshot, SnapshotOrigin, VersionSummary,
};
use folio_core::{log_op_end, log_op_error, log_op_start};
use folio_store::errors::{from_rusqlite, Result};
use folio_store::snapshot::{self, ListOptions};
use folio_store::ContentRepo;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, EngineContext};

/// Change summary given to every draft
pub const DRAFT_SUMMARY: &str = "Draft";

/// One page of an entity's history plus the total for pagination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionPage {
    /// Newest first
    pub versions: Vec<VersionSummary>,
    pub total: u64,
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Snapshot the live entity as a new current version.
///
/// # Errors
///
/// `NotFound` if the live entity does not exist; `ConcurrentModification`
/// once retries are exhausted.
pub fn create_version(
    conn: &mut Connection,
    ctx: &EngineContext<'_>,
    entity: EntityRef,
    author: Option<&str>,
    summary: &str,
    notes: Option<&str>,
) -> Result<Snapshot> {
    let snap = run_write(conn, ctx, "create_version", entity, |conn| {
        let adapter = ctx.adapters.get(entity.kind)?;
        let tx = begin(conn)?;
        let live = load_live(&tx, entity)?;
        let payload = adapter.fields(&live)?;

        let snap = snapshot::append(
            &tx,
            entity,
            NewSnapshot {
                payload,
                author: author.map(str::to_string),
                change_summary: summary.to_string(),
                change_notes: notes.map(str::to_string),
                origin: SnapshotOrigin::Save,
            },
        )?;
        snapshot::set_current(&tx, entity, snap.version_number)?;
        tx.commit().map_err(from_rusqlite)?;

        Ok(Snapshot {
            is_current: true,
            ..snap
        })
    })?;

    ctx.events.notify(&VersionEvent::CurrentChanged {
        entity,
        version_number: snap.version_number,
    });
    Ok(snap)
}

/// Park a supplied payload as a draft. Neither flag moves.
///
/// # Errors
///
/// `UnsupportedOperation` if the kind has no drafts; `ValidationError` for a
/// malformed payload (nothing is written); `NotFound` if the live entity is
/// missing.
pub fn create_draft(
    conn: &mut Connection,
    ctx: &EngineContext<'_>,
    entity: EntityRef,
    author: Option<&str>,
    payload: &Payload,
    notes: Option<&str>,
) -> Result<Snapshot> {
    let snap = run_write(conn, ctx, "create_draft", entity, |conn| {
        let adapter = ctx.adapters.get(entity.kind)?;
        if !adapter.supports_drafts() {
            return Err(ContentError::DraftsUnsupported { kind: entity.kind }.into());
        }
        adapter.validate_payload(payload)?;

        let tx = begin(conn)?;
        load_live(&tx, entity)?;
        let snap = snapshot::append(
            &tx,
            entity,
            NewSnapshot {
                payload: payload.clone(),
                author: author.map(str::to_string),
                change_summary: DRAFT_SUMMARY.to_string(),
                change_notes: notes.map(str::to_string),
                origin: SnapshotOrigin::Draft,
            },
        )?;
        tx.commit().map_err(from_rusqlite)?;
        Ok(snap)
    })?;

    ctx.events.notify(&VersionEvent::DraftCreated {
        entity,
        version_number: snap.version_number,
    });
    Ok(snap)
}

/// Write version `version_number` back onto the live entity and record the
/// result as a new current version summarised "Restored to version {n}".
///
/// History is never rewritten: the restored content always gets a new
/// number.
///
/// # Errors
///
/// `NotFound` if the live entity or the version does not exist.
pub fn restore_to_version(
    conn: &mut Connection,
    ctx: &EngineContext<'_>,
    entity: EntityRef,
    version_number: u32,
    author: Option<&str>,
    notes: Option<&str>,
) -> Result<Snapshot> {
    let snap = run_write(conn, ctx, "restore_to_version", entity, |conn| {
        let adapter = ctx.adapters.get(entity.kind)?;
        let tx = begin(conn)?;
        let target = find_version(&tx, entity, version_number)?;
        let mut live = load_live(&tx, entity)?;

        adapter.apply(&mut live, &target.payload)?;
        ContentRepo::save(&tx, &live)?;
        let payload = adapter.fields(&live)?;

        let snap = snapshot::append(
            &tx,
            entity,
            NewSnapshot {
                payload,
                author: author.map(str::to_string),
                change_summary: format!("Restored to version {}", version_number),
                change_notes: notes.map(str::to_string),
                origin: SnapshotOrigin::Restore,
            },
        )?;
        snapshot::set_current(&tx, entity, snap.version_number)?;
        tx.commit().map_err(from_rusqlite)?;

        Ok(Snapshot {
            is_current: true,
            ..snap
        })
    })?;

    ctx.events.notify(&VersionEvent::CurrentChanged {
        entity,
        version_number: snap.version_number,
    });
    Ok(snap)
}

/// Make `version_number` the live version. It need not be current.
///
/// # Errors
///
/// `NotFound` if the live entity or the version does not exist.
pub fn publish_version(
    conn: &mut Connection,
    ctx: &EngineContext<'_>,
    entity: EntityRef,
    version_number: u32,
) -> Result<Snapshot> {
    let snap = run_write(conn, ctx, "publish_version", entity, |conn| {
        let tx = begin(conn)?;
        load_live(&tx, entity)?;
        snapshot::set_published(&tx, entity, Some(version_number), Utc::now())?;
        let snap = find_version(&tx, entity, version_number)?;
        tx.commit().map_err(from_rusqlite)?;
        Ok(snap)
    })?;

    ctx.events.notify(&VersionEvent::PublishedChanged {
        entity,
        version_number: Some(snap.version_number),
    });
    Ok(snap)
}

/// Take the entity offline. Returns the snapshot that was live, if any;
/// it keeps its `published_at`.
///
/// # Errors
///
/// `ConcurrentModification` once retries are exhausted; `Persistence` for
/// any other database failure.
pub fn unpublish(
    conn: &mut Connection,
    ctx: &EngineContext<'_>,
    entity: EntityRef,
) -> Result<Option<Snapshot>> {
    let previous = run_write(conn, ctx, "unpublish", entity, |conn| {
        let tx = begin(conn)?;
        let previous = match snapshot::published(&tx, entity)? {
            Some(live) => {
                snapshot::set_published(&tx, entity, None, Utc::now())?;
                Some(Snapshot {
                    is_published: false,
                    ..live
                })
            }
            None => None,
        };
        tx.commit().map_err(from_rusqlite)?;
        Ok(previous)
    })?;

    if previous.is_some() {
        ctx.events.notify(&VersionEvent::PublishedChanged {
            entity,
            version_number: None,
        });
    }
    Ok(previous)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// The snapshot editors are working from; `None` before the first save
///
/// # Errors
///
/// `Persistence` if the read fails, `Serialization` if the stored payload
/// is not valid JSON.
pub fn current_version(
    conn: &Connection,
    ctx: &EngineContext<'_>,
    entity: EntityRef,
) -> Result<Option<Snapshot>> {
    run_read(ctx, "current_version", entity, || snapshot::current(conn, entity))
}

/// The snapshot the public sees; `None` when never published or unpublished
///
/// # Errors
///
/// `Persistence` if the read fails, `Serialization` if the stored payload
/// is not valid JSON.
pub fn latest_published_version(
    conn: &Connection,
    ctx: &EngineContext<'_>,
    entity: EntityRef,
) -> Result<Option<Snapshot>> {
    run_read(ctx, "latest_published_version", entity, || {
        snapshot::published(conn, entity)
    })
}

/// One version with its full payload
///
/// # Errors
///
/// `NotFound` if the version does not exist.
pub fn get_version(
    conn: &Connection,
    ctx: &EngineContext<'_>,
    entity: EntityRef,
    version_number: u32,
) -> Result<Snapshot> {
    run_read(ctx, "get_version", entity, || {
        find_version(conn, entity, version_number)
    })
}

/// History page, newest first, with the total count
///
/// # Errors
///
/// `Persistence` if the read fails, `Serialization` if a stored payload is
/// not valid JSON.
pub fn get_version_history(
    conn: &Connection,
    ctx: &EngineContext<'_>,
    entity: EntityRef,
    options: ListOptions,
) -> Result<VersionPage> {
    run_read(ctx, "get_version_history", entity, || {
        let versions = snapshot::list_by_entity(conn, entity, options)?
            .iter()
            .map(Snapshot::summary)
            .collect();
        let total = snapshot::count_by_entity(conn, entity)?;
        Ok(VersionPage { versions, total })
    })
}

/// Field-level comparison of two versions of one entity
///
/// # Errors
///
/// `NotFound` if either version does not exist.
pub fn compare_versions(
    conn: &Connection,
    ctx: &EngineContext<'_>,
    entity: EntityRef,
    version1: u32,
    version2: u32,
) -> Result<VersionComparison> {
    run_read(ctx, "compare_versions", entity, || {
        let a = find_version(conn, entity, version1)?;
        let b = find_version(conn, entity, version2)?;
        compare_snapshots(&a, &b)
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn begin(conn: &mut Connection) -> Result<Transaction<'_>> {
    conn.transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(from_rusqlite)
}

fn load_live(conn: &Connection, entity: EntityRef) -> Result<ContentEntity> {
    ContentRepo::load(conn, entity)?.ok_or_else(|| {
        ContentError::EntityNotFound {
            kind: entity.kind,
            id: entity.id,
        }
        .into()
    })
}

fn find_version(conn: &Connection, entity: EntityRef, version_number: u32) -> Result<Snapshot> {
    snapshot::find(conn, entity, version_number)?.ok_or_else(|| {
        ContentError::VersionNotFound {
            entity,
            version_number,
        }
        .into()
    })
}

/// Retry `attempt` while it fails with a transient error
fn with_retry<T>(
    conn: &mut Connection,
    config: &EngineConfig,
    op: &str,
    mut attempt: impl FnMut(&mut Connection) -> Result<T>,
) -> Result<T> {
    let mut retries = 0u32;
    loop {
        match attempt(conn) {
            Err(err) if err.is_transient() && retries < config.max_retries => {
                retries += 1;
                tracing::warn!(
                    op = op,
                    retry = retries,
                    error = %err,
                    "Retrying after concurrent modification"
                );
                std::thread::sleep(Duration::from_millis(
                    config.retry_backoff_ms * u64::from(retries),
                ));
            }
            result => return result,
        }
    }
}

fn run_write<T>(
    conn: &mut Connection,
    ctx: &EngineContext<'_>,
    op: &'static str,
    entity: EntityRef,
    attempt: impl FnMut(&mut Connection) -> Result<T>,
) -> Result<T> {
    let start = Instant::now();
    let request_id = ctx.request.request_id.as_str();
    log_op_start!(op, request_id = request_id, entity = %entity);

    let result =
        with_retry(conn, &ctx.config, op, attempt).map_err(|e| annotate(e, ctx, op, entity));

    finish(op, request_id, start, &result);
    result
}

fn run_read<T>(
    ctx: &EngineContext<'_>,
    op: &'static str,
    entity: EntityRef,
    read: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let start = Instant::now();
    let request_id = ctx.request.request_id.as_str();
    log_op_start!(op, request_id = request_id, entity = %entity);

    let result = read().map_err(|e| annotate(e, ctx, op, entity));

    finish(op, request_id, start, &result);
    result
}

fn finish<T>(op: &str, request_id: &str, start: Instant, result: &Result<T>) {
    let duration_ms = elapsed_ms(start);
    match result {
        Ok(_) => {
            log_op_end!(op, duration_ms = duration_ms, request_id = request_id);
        }
        Err(e) => {
            log_op_error!(
                op,
                e.clone(),
                duration_ms = duration_ms,
                request_id = request_id
            );
        }
    }
}

/// Milliseconds since `start`, saturating rather than truncating
fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Attach request and entity context without overwriting what the failing
/// layer already recorded
fn annotate(err: ExError, ctx: &EngineContext<'_>, op: &str, entity: EntityRef) -> ExError {
    let mut err = err.with_request_id(ctx.request.request_id.clone());
    if let Some(trace_id) = &ctx.request.trace_id {
        err = err.with_trace_id(trace_id.clone());
    }
    if err.op().is_none() {
        err = err.with_op(op);
    }
    if err.entity_id().is_none() {
        err = err.with_entity(entity);
    }
    err
}
