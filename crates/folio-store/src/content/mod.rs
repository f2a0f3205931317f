//! Live content persistence
//!
//! One table per content kind. These rows are what editors change; the
//! versioning engine snapshots them and writes them back on restore.

mod sqlite_repo;

pub use sqlite_repo::ContentRepo;
