//! Folio CLI
//!
//! Command-line interface for content versioning

use clap::{Parser, Subcommand};
use folio_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(about = "Folio - Content versioning and publication", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: commands::GlobalOpts,

    /// Logging profile (dev, prod, test); logging stays off when unset
    #[arg(long, global = true, env = "FOLIO_LOG_PROFILE")]
    log: Option<Profile>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Live content records
    Content(commands::content::ContentArgs),
    /// Version history, restore and publication
    Versions(commands::version::VersionArgs),
}

fn main() {
    // A missing .env file is normal
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Some(profile) = cli.log {
        logging_facility::init(profile);
    }

    let result = match cli.command {
        Commands::Content(args) => commands::content::execute(args, &cli.global),
        Commands::Versions(args) => commands::version::execute(args, &cli.global),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
