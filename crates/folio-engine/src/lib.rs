//! Folio Engine - Versioning orchestration
//!
//! Coordinates content adapters, the snapshot store and live content rows
//! so that every write keeps the per-entity flag invariants: exactly one
//! current snapshot once history exists, at most one published snapshot.

pub mod commands;
pub mod config;

pub use config::{EngineConfig, EngineContext};
