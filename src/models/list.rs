//! List types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Card, FolderId, Keyword, UserId};

/// Unique identifier of a list (SQLite rowid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(i64);

impl ListId {
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

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ListId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A named, user-owned set of flashcards with its decoded collections.
///
/// This is the in-memory view the services work with; the three collections
/// are stored as independently serialized columns on the `lists` row and
/// decoded by [`crate::codec`].
#[derive(Debug, Clone)]
pub struct List {
    /// Unique identifier.
    pub id: ListId,
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Ordered cards; ids are stable 1-based creation positions.
    pub cards: Vec<Card>,
    /// Folder memberships as folder-id strings (original wire format).
    pub folders: Vec<String>,
    /// Ordered keywords.
    pub keywords: Vec<Keyword>,
    /// Derived URL-safe slug, unique across all lists.
    pub path: String,
    /// Owning user.
    pub user_id: UserId,
    /// Creation timestamp (Unix epoch seconds).
    pub creation_date: i64,
}

impl List {
    /// Whether this list is a member of the given folder.
    ///
    /// Membership is string-compared against the stored folder-id array.
    #[must_use]
    pub fn in_folder(&self, folder_id: FolderId) -> bool {
        let wanted = folder_id.to_string();
        self.folders.iter().any(|f| *f == wanted)
    }
}

/// Term/definition pair submitted at list creation, before ids are assigned.
#[derive(Debug, Clone, Default)]
pub struct NewCard {
    /// The prompt side.
    pub term: String,
    /// The answer side.
    pub definition: String,
}

impl NewCard {
    /// Creates a new card submission.
    #[must_use]
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
        }
    }

    /// Whether the submission carries any content.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.term.is_empty() || !self.definition.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_list(folders: Vec<String>) -> List {
        List {
            id: ListId::new(1),
            title: "French basics".to_string(),
            description: String::new(),
            cards: Vec::new(),
            folders,
            keywords: Vec::new(),
            path: "french-basics_1".to_string(),
            user_id: UserId::new(1),
            creation_date: 0,
        }
    }

    #[test]
    fn test_in_folder_string_compares_ids() {
        let list = sample_list(vec!["3".to_string(), "12".to_string()]);
        assert!(list.in_folder(FolderId::new(3)));
        assert!(list.in_folder(FolderId::new(12)));
        assert!(!list.in_folder(FolderId::new(1)));
    }

    #[test]
    fn test_in_folder_empty_membership() {
        let list = sample_list(Vec::new());
        assert!(!list.in_folder(FolderId::new(3)));
    }
}
