//! CLI subcommands and the options they share

use std::path::Path;

use clap::Args;
use folio_engine::EngineConfig;
use rusqlite::Connection;

pub mod content;
pub mod version;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// SQLite database file
    #[arg(long, global = true, env = "FOLIO_DB", default_value = ".folio/folio.db")]
    pub db: String,

    /// Retries after a concurrent modification before giving up
    #[arg(long, global = true, env = "FOLIO_MAX_RETRIES", default_value_t = 3)]
    pub max_retries: u32,
}

impl GlobalOpts {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_retries: self.max_retries,
            ..EngineConfig::default()
        }
    }

    /// Open the database, creating the file and schema on first use
    pub fn open_db(&self) -> Result<Connection, Box<dyn std::error::Error>> {
        if let Some(parent) = Path::new(&self.db).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = folio_store::db::open_configured(&self.db, self.engine_config().busy_timeout_ms)?;
        Ok(conn)
    }
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
