//! Live content commands

use clap::{Args, Subcommand};
use folio_core::errors::{ContentError, ExError};
use folio_core::model::{ContentEntity, EntityRef};
use folio_store::ContentRepo;

use super::{print_json, CliResult, GlobalOpts};

#[derive(Debug, Args)]
pub struct ContentArgs {
    #[command(subcommand)]
    pub command: ContentCommand,
}

#[derive(Debug, Subcommand)]
pub enum ContentCommand {
    /// Create or replace a live record from JSON tagged with its `kind`
    Put(PutArgs),
    /// Print a live record
    Get {
        /// Entity reference, e.g. insight:12
        entity: EntityRef,
    },
}

#[derive(Debug, Args)]
pub struct PutArgs {
    /// Inline JSON record
    #[arg(long, conflicts_with = "file")]
    pub json: Option<String>,

    /// Path to a JSON record
    #[arg(long, conflicts_with = "json")]
    pub file: Option<String>,
}

pub fn execute(args: ContentArgs, global: &GlobalOpts) -> CliResult {
    match args.command {
        ContentCommand::Put(put) => execute_put(put, global),
        ContentCommand::Get { entity } => execute_get(entity, global),
    }
}

fn execute_put(args: PutArgs, global: &GlobalOpts) -> CliResult {
    let text = match (args.json, args.file) {
        (Some(json), _) => json,
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => return Err("Must specify either --json or --file".into()),
    };
    let entity: ContentEntity = serde_json::from_str(&text)?;
    let entity_ref = EntityRef::new(entity.kind(), entity.id()).map_err(ExError::from)?;

    let conn = global.open_db()?;
    ContentRepo::save(&conn, &entity)?;

    print_json(&serde_json::json!({ "saved": entity_ref.to_string() }))
}

fn execute_get(entity: EntityRef, global: &GlobalOpts) -> CliResult {
    let conn = global.open_db()?;
    let record = ContentRepo::load(&conn, entity)?.ok_or_else(|| {
        ExError::from(ContentError::EntityNotFound {
            kind: entity.kind,
            id: entity.id,
        })
    })?;
    print_json(&record)
}
