//! Command orchestration layer.
//!
//! `versioning` holds the operations; `engine_command` and `engine_query`
//! expose them as a single write entry point and a single read entry point.

pub mod engine_command;
pub mod engine_query;
pub mod versioning;
