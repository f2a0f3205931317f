//! Engine-level read-only query surface.
//!
//! `apply_engine_query` is the single entry point for history reads. Unlike
//! `apply_engine_command`, it takes a shared connection and never writes.

#![allow(clippy::result_large_err)]

use folio_core::diff::{render_human_summary, VersionComparison};
use folio_core::model::{EntityRef, Snapshot};
use folio_store::errors::Result;
use folio_store::snapshot::ListOptions;
use rusqlite::Connection;

use crate::commands::versioning::{self, VersionPage};
use crate::config::EngineContext;

/// Read-only queries supported by the engine.
#[derive(Debug, Clone)]
pub enum EngineQuery {
    /// History of an entity, newest first.
    ListVersions {
        entity: EntityRef,
        options: ListOptions,
    },
    /// Field-level differences from `v1` to `v2`.
    Compare {
        entity: EntityRef,
        v1: u32,
        v2: u32,
    },
    /// One version including its payload.
    ShowVersion {
        entity: EntityRef,
        version_number: u32,
    },
    CurrentVersion { entity: EntityRef },
    PublishedVersion { entity: EntityRef },
}

/// The structured and rendered result of a `Compare` query.
#[derive(Debug, Clone)]
pub struct CompareResult {
    pub comparison: VersionComparison,
    /// Markdown summary for display
    pub human_summary: String,
}

/// Result of an engine query.
#[derive(Debug, Clone)]
pub enum EngineQueryResult {
    Versions(VersionPage),
    Compare(Box<CompareResult>),
    Version(Box<Snapshot>),
    /// Current or published holder; `None` when nobody holds the flag
    Holder(Option<Box<Snapshot>>),
}

/// Apply a read-only engine query.
///
/// # Errors
///
/// `NotFound` when a named version does not exist.
pub fn apply_engine_query(
    query: EngineQuery,
    conn: &Connection,
    ctx: &EngineContext<'_>,
) -> Result<EngineQueryResult> {
    match query {
        EngineQuery::ListVersions { entity, options } => {
            versioning::get_version_history(conn, ctx, entity, options)
                .map(EngineQueryResult::Versions)
        }

        EngineQuery::Compare { entity, v1, v2 } => {
            let comparison = versioning::compare_versions(conn, ctx, entity, v1, v2)?;
            let human_summary = render_human_summary(&comparison);
            Ok(EngineQueryResult::Compare(Box::new(CompareResult {
                comparison,
                human_summary,
            })))
        }

        EngineQuery::ShowVersion {
            entity,
            version_number,
        } => versioning::get_version(conn, ctx, entity, version_number)
            .map(|snap| EngineQueryResult::Version(Box::new(snap))),

        EngineQuery::CurrentVersion { entity } => versioning::current_version(conn, ctx, entity)
            .map(|snap| EngineQueryResult::Holder(snap.map(Box::new))),

        EngineQuery::PublishedVersion { entity } => {
            versioning::latest_published_version(conn, ctx, entity)
                .map(|snap| EngineQueryResult::Holder(snap.map(Box::new)))
        }
    }
}
