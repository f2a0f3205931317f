//! Version diff engine.
//!
//! Compares two snapshot payloads field by field and reports what an
//! editor changed between them.
//!
//! ## Entry point
//!
//! ```
//! use folio_core::diff::compute_diff;
//! use folio_core::model::Payload;
//! use serde_json::json;
//!
//! let mut a = Payload::new();
//! a.insert("title".into(), json!("A"));
//! let mut b = Payload::new();
//! b.insert("title".into(), json!("B"));
//!
//! let differences = compute_diff(&a, &b);
//! assert_eq!(differences.len(), 1);
//! ```
//!
//! ## Guarantees
//!
//! - **Field-level**: a change anywhere inside a nested value is reported once,
//!   as `modified`, at its top-level field.
//! - **Deterministic order**: added/modified entries follow the second payload's
//!   key order, then removed entries follow the first payload's key order.
//! - **Pure**: no I/O, no mutation of inputs.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{compare_snapshots, compute_diff};
pub use human_summary::render_human_summary;
pub use model::{ChangeKind, FieldDiff, VersionComparison};
