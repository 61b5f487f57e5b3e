//! Persistence layer.
//!
//! Storage is a trait seam: services depend on [`StudyBackend`] and the
//! `SQLite` implementation lives in [`sqlite_store`]. Shared connection
//! utilities (locking, pragmas) are in [`sqlite`].

pub mod sqlite;
mod sqlite_store;
mod traits;

pub use sqlite_store::SqliteStudyBackend;
pub use traits::{ListColumn, ListRow, StudyBackend};
