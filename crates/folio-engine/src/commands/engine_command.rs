//! Engine-level write commands.

#![allow(clippy::result_large_err)]

use folio_core::model::{EntityRef, Payload, Snapshot};
use folio_store::errors::Result;
use rusqlite::Connection;

use crate::commands::versioning;
use crate::config::EngineContext;

/// Commands that change an entity's version history or flags.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Snapshot the live entity as the new current version.
    CreateVersion {
        entity: EntityRef,
        author: Option<String>,
        summary: String,
        notes: Option<String>,
    },
    /// Write an old version back and record it as a new current version.
    Restore {
        entity: EntityRef,
        version_number: u32,
        author: Option<String>,
        notes: Option<String>,
    },
    /// Move the published flag.
    Publish {
        entity: EntityRef,
        version_number: u32,
    },
    /// Clear the published flag.
    Unpublish { entity: EntityRef },
    /// Park a supplied payload without moving either flag.
    CreateDraft {
        entity: EntityRef,
        author: Option<String>,
        payload: Payload,
        notes: Option<String>,
    },
}

/// Result of applying an engine command.
#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    VersionCreated { current_version: Snapshot },
    Restored { current_version: Snapshot },
    Published { published_version: Snapshot },
    /// `None` when nothing was live
    Unpublished { previous: Option<Snapshot> },
    DraftCreated { draft: Snapshot },
}

/// Apply an engine command.
///
/// # Errors
///
/// Propagates the failure of the underlying versioning operation.
pub fn apply_engine_command(
    cmd: EngineCommand,
    conn: &mut Connection,
    ctx: &EngineContext<'_>,
) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::CreateVersion {
            entity,
            author,
            summary,
            notes,
        } => versioning::create_version(
            conn,
            ctx,
            entity,
            author.as_deref(),
            &summary,
            notes.as_deref(),
        )
        .map(|current_version| EngineCommandResult::VersionCreated { current_version }),

        EngineCommand::Restore {
            entity,
            version_number,
            author,
            notes,
        } => versioning::restore_to_version(
            conn,
            ctx,
            entity,
            version_number,
            author.as_deref(),
            notes.as_deref(),
        )
        .map(|current_version| EngineCommandResult::Restored { current_version }),

        EngineCommand::Publish {
            entity,
            version_number,
        } => versioning::publish_version(conn, ctx, entity, version_number)
            .map(|published_version| EngineCommandResult::Published { published_version }),

        EngineCommand::Unpublish { entity } => versioning::unpublish(conn, ctx, entity)
            .map(|previous| EngineCommandResult::Unpublished { previous }),

        EngineCommand::CreateDraft {
            entity,
            author,
            payload,
            notes,
        } => versioning::create_draft(
            conn,
            ctx,
            entity,
            author.as_deref(),
            &payload,
            notes.as_deref(),
        )
        .map(|draft| EngineCommandResult::DraftCreated { draft }),
    }
}
