//! Snapshot store
//!
//! Append-only history of content versions in the `content_versions` table.
//!
//! ## Responsibilities
//!
//! - Allocate the next version number and append a snapshot
//! - Move the current and published flags between snapshots
//! - Read history, single versions and flag holders
//!
//! ## Non-Responsibilities
//!
//! - Deciding when to flip flags, or loading live content
//!   (handled by `folio-engine`)
//! - Opening transactions; writes run inside the caller's transaction

pub mod persist;
pub mod query;
mod row;

pub use persist::{append, set_current, set_published};
pub use query::{count_by_entity, current, find, list_by_entity, published, ListOptions};
