//! Folio Store - SQLite persistence for content and its version history
//!
//! Provides:
//! - SQLite schema with a checksummed migrations framework
//! - The append-only snapshot store (`content_versions`)
//! - Live content rows for articles, portfolio items and services

pub mod content;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod snapshot;

// Re-export key types
pub use content::ContentRepo;
pub use errors::Result;
pub use snapshot::ListOptions;
