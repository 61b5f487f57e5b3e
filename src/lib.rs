//! # Cardbox
//!
//! Flashcard study core: user-owned card lists, folders, and keywords.
//!
//! Cardbox implements the data model and mutation operations behind a
//! flashcard study application. Users own *lists* of term/definition cards;
//! lists can be grouped into *folders* and tagged with toggleable *keywords*.
//! The web layer (routing, sessions, rendering) is an external collaborator:
//! this crate exposes the operations that layer calls.
//!
//! ## Architecture
//!
//! - [`storage`]: SQLite persistence behind the [`StudyBackend`] trait seam
//! - [`codec`]: JSON encoding of a list's cards, folder memberships, keywords
//! - [`services`]: one service per operation family (accounts, lists,
//!   folders, keywords, cards)
//!
//! Every mutation of a list's serialized collections runs as a single atomic
//! read-modify-write inside an immediate transaction, so concurrent edits to
//! the same list cannot lose updates.
//!
//! ## Example
//!
//! ```rust,ignore
//! use cardbox::{AccountService, ListService, NewCard};
//!
//! let user = accounts.register("alice", password_hash)?;
//! let list = lists.create(user.id, "French basics", "Animal words", vec![
//!     NewCard::new("dog", "chien"),
//!     NewCard::new("cat", "chat"),
//! ])?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod codec;
pub mod config;
pub mod models;
pub mod services;
pub mod storage;

// Re-exports for convenience
pub use config::CardboxConfig;
pub use models::{Card, Folder, FolderId, Keyword, List, ListId, NewCard, User, UserId};
pub use services::{AccountService, CardService, FolderService, KeywordService, ListService};
pub use storage::{SqliteStudyBackend, StudyBackend};

/// Error type for cardbox operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Empty username/folder name/keyword text, fewer than 2 usable cards |
/// | `NotFound` | Referenced list/folder/user/card/keyword does not exist |
/// | `Forbidden` | Referenced row exists but belongs to another user |
/// | `MalformedData` | A serialized column does not parse as the expected JSON |
/// | `Conflict` | Username already taken at registration |
/// | `OperationFailed` | `SQLite` errors, I/O errors, config parse errors |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A required field is empty (username, password hash, title, folder
    ///   name, keyword text)
    /// - List creation supplies fewer than 2 cards with a non-empty term or
    ///   definition
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced entity does not exist.
    #[error("{resource} {id} not found")]
    NotFound {
        /// Kind of entity that was looked up ("list", "folder", "card", ...).
        resource: &'static str,
        /// The id that had no match.
        id: i64,
    },

    /// A referenced entity exists but is owned by a different user.
    ///
    /// The original application silently skipped the write in this case;
    /// callers here get an explicit error instead.
    #[error("{resource} {id} does not belong to user {user_id}")]
    Forbidden {
        /// Kind of entity that was addressed.
        resource: &'static str,
        /// Id of the addressed entity.
        id: i64,
        /// The requesting user.
        user_id: i64,
    },

    /// A serialized column holds text that does not parse.
    ///
    /// Surfaced to the caller as a request failure; never panics the process.
    #[error("malformed {column} data: {cause}")]
    MalformedData {
        /// The list column that failed to decode ("cards", "folders",
        /// "keywords").
        column: &'static str,
        /// The underlying parse error.
        cause: String,
    },

    /// A uniqueness constraint was violated.
    ///
    /// Raised when registering a username that already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - `SQLite` database operations fail
    /// - Filesystem I/O errors occur
    /// - The config file cannot be read or parsed
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for cardbox operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current Unix timestamp in seconds.
///
/// Centralized so every creation/registration date is derived the same way.
/// Falls back to 0 if the system clock is before the Unix epoch.
#[must_use]
pub fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}
