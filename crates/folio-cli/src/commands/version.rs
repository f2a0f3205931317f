//! Version history commands
//!
//! Every subcommand goes through `apply_engine_command` or
//! `apply_engine_query`, so the CLI gets the same retries, logging and
//! invariants as any other caller.

use clap::{Args, Subcommand};
use folio_core::content::AdapterRegistry;
use folio_core::model::{EntityRef, Payload};
use folio_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};
use folio_engine::commands::engine_query::{apply_engine_query, EngineQuery, EngineQueryResult};
use folio_engine::EngineContext;
use folio_store::snapshot::ListOptions;

use super::{print_json, CliResult, GlobalOpts};

#[derive(Debug, Args)]
pub struct VersionArgs {
    #[command(subcommand)]
    pub command: VersionCommand,
}

#[derive(Debug, Subcommand)]
pub enum VersionCommand {
    /// List an entity's versions, newest first
    List {
        entity: EntityRef,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Show one version with its payload
    Show { entity: EntityRef, version: u32 },
    /// Compare two versions field by field
    Compare {
        entity: EntityRef,
        v1: u32,
        v2: u32,
        /// Print the structured comparison instead of the Markdown summary
        #[arg(long)]
        json: bool,
    },
    /// Snapshot the live record as the new current version
    Save {
        entity: EntityRef,
        #[arg(long)]
        summary: String,
        #[command(flatten)]
        meta: AuthorArgs,
    },
    /// Restore an old version as a new current version
    Restore {
        entity: EntityRef,
        version: u32,
        #[command(flatten)]
        meta: AuthorArgs,
    },
    /// Make a version the live one
    Publish { entity: EntityRef, version: u32 },
    /// Take the entity offline
    Unpublish { entity: EntityRef },
    /// Park a JSON payload as a draft
    Draft {
        entity: EntityRef,
        /// JSON object holding every versioned field of the kind
        #[arg(long)]
        payload: String,
        #[command(flatten)]
        meta: AuthorArgs,
    },
}

#[derive(Debug, Args)]
pub struct AuthorArgs {
    #[arg(long, env = "FOLIO_AUTHOR")]
    pub author: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

pub fn execute(args: VersionArgs, global: &GlobalOpts) -> CliResult {
    let adapters = AdapterRegistry::with_defaults();
    let ctx = EngineContext::new(&adapters).with_config(global.engine_config());
    let mut conn = global.open_db()?;

    let command = match args.command {
        VersionCommand::List {
            entity,
            limit,
            offset,
        } => {
            let query = EngineQuery::ListVersions {
                entity,
                options: ListOptions { limit, offset },
            };
            return match apply_engine_query(query, &conn, &ctx)? {
                EngineQueryResult::Versions(page) => print_json(&page),
                other => Err(unexpected(&other)),
            };
        }
        VersionCommand::Show { entity, version } => {
            let query = EngineQuery::ShowVersion {
                entity,
                version_number: version,
            };
            return match apply_engine_query(query, &conn, &ctx)? {
                EngineQueryResult::Version(snap) => print_json(&snap),
                other => Err(unexpected(&other)),
            };
        }
        VersionCommand::Compare {
            entity,
            v1,
            v2,
            json,
        } => {
            let query = EngineQuery::Compare { entity, v1, v2 };
            return match apply_engine_query(query, &conn, &ctx)? {
                EngineQueryResult::Compare(result) if json => print_json(&result.comparison),
                EngineQueryResult::Compare(result) => {
                    print!("{}", result.human_summary);
                    Ok(())
                }
                other => Err(unexpected(&other)),
            };
        }
        VersionCommand::Save {
            entity,
            summary,
            meta,
        } => EngineCommand::CreateVersion {
            entity,
            author: meta.author,
            summary,
            notes: meta.notes,
        },
        VersionCommand::Restore {
            entity,
            version,
            meta,
        } => EngineCommand::Restore {
            entity,
            version_number: version,
            author: meta.author,
            notes: meta.notes,
        },
        VersionCommand::Publish { entity, version } => EngineCommand::Publish {
            entity,
            version_number: version,
        },
        VersionCommand::Unpublish { entity } => EngineCommand::Unpublish { entity },
        VersionCommand::Draft {
            entity,
            payload,
            meta,
        } => EngineCommand::CreateDraft {
            entity,
            author: meta.author,
            payload: serde_json::from_str::<Payload>(&payload)?,
            notes: meta.notes,
        },
    };

    match apply_engine_command(command, &mut conn, &ctx)? {
        EngineCommandResult::VersionCreated { current_version }
        | EngineCommandResult::Restored { current_version } => print_json(&current_version),
        EngineCommandResult::Published { published_version } => print_json(&published_version),
        EngineCommandResult::Unpublished { previous } => {
            print_json(&serde_json::json!({ "unpublished": previous }))
        }
        EngineCommandResult::DraftCreated { draft } => print_json(&draft),
    }
}

fn unexpected(result: &EngineQueryResult) -> Box<dyn std::error::Error> {
    format!("unexpected query result: {:?}", result).into()
}
