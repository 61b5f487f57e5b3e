//! Folder types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a folder (SQLite rowid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(i64);

impl FolderId {
    /// Wraps a raw row id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw row id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for FolderId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A user-owned named grouping that lists can be added to and removed from.
///
/// Folders are created once and never mutated; no delete path exists.
#[derive(Debug, Clone)]
pub struct Folder {
    /// Unique identifier.
    pub id: FolderId,
    /// Display name.
    pub name: String,
    /// Derived URL-safe slug, unique across all folders.
    pub path: String,
    /// Owning user.
    pub user_id: super::UserId,
    /// Creation timestamp (Unix epoch seconds).
    pub creation_date: i64,
}
