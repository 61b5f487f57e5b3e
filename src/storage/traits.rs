//! Storage trait seam for the study data model.

use crate::models::{Folder, FolderId, List, ListId, User, UserId};
use crate::{Result, codec};

/// One of the three serialized collection columns on a `lists` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListColumn {
    /// The `cards` column.
    Cards,
    /// The `folders` (membership) column.
    Folders,
    /// The `keywords` column.
    Keywords,
}

impl ListColumn {
    /// The SQL column name. Fixed set, so column names never come from input.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cards => "cards",
            Self::Folders => "folders",
            Self::Keywords => "keywords",
        }
    }
}

/// A `lists` row as stored: collections still in their serialized form.
///
/// Services decode the columns they need via [`crate::codec`]; [`Self::decode`]
/// produces the fully decoded [`List`] view.
#[derive(Debug, Clone)]
pub struct ListRow {
    /// Unique identifier.
    pub id: ListId,
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Raw `cards` column.
    pub cards: Option<String>,
    /// Raw `folders` column.
    pub folders: Option<String>,
    /// Raw `keywords` column.
    pub keywords: Option<String>,
    /// Derived URL-safe slug.
    pub path: String,
    /// Owning user.
    pub user_id: UserId,
    /// Creation timestamp (Unix epoch seconds).
    pub creation_date: i64,
}

impl ListRow {
    /// Decodes all three serialized columns into a [`List`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MalformedData`] if any column fails to parse.
    pub fn decode(self) -> Result<List> {
        Ok(List {
            id: self.id,
            title: self.title,
            description: self.description,
            cards: codec::decode_cards(self.cards.as_deref())?,
            folders: codec::decode_folders(self.folders.as_deref())?,
            keywords: codec::decode_keywords(self.keywords.as_deref())?,
            path: self.path,
            user_id: self.user_id,
            creation_date: self.creation_date,
        })
    }
}

/// Persistence operations for users, lists, and folders.
///
/// Implementations must be safe to share across threads; services hold a
/// backend behind `Arc<dyn StudyBackend>`.
pub trait StudyBackend: Send + Sync {
    // -- users --

    /// Inserts a new user row.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Conflict`] if the username is already taken,
    /// or [`crate::Error::OperationFailed`] on database errors.
    fn create_user(&self, username: &str, password_hash: &str, registered_at: i64)
    -> Result<User>;

    /// Fetches a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OperationFailed`] on database errors.
    fn get_user(&self, id: UserId) -> Result<Option<User>>;

    /// Fetches a user by unique username.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OperationFailed`] on database errors.
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    // -- folders --

    /// Inserts a new folder row with a collision-retried unique path.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OperationFailed`] on database errors or if the
    /// path retry budget is exhausted.
    fn create_folder(&self, user_id: UserId, name: &str, created_at: i64) -> Result<Folder>;

    /// Fetches a folder by id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OperationFailed`] on database errors.
    fn get_folder(&self, id: FolderId) -> Result<Option<Folder>>;

    /// Fetches a folder by its unique path.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OperationFailed`] on database errors.
    fn get_folder_by_path(&self, path: &str) -> Result<Option<Folder>>;

    /// Lists a user's folders in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OperationFailed`] on database errors.
    fn list_folders(&self, user_id: UserId) -> Result<Vec<Folder>>;

    // -- lists --

    /// Inserts a new list row with a collision-retried unique path.
    ///
    /// `cards_json` is the already-encoded `cards` column; the folder and
    /// keyword columns start absent, matching the original row layout.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OperationFailed`] on database errors or if the
    /// path retry budget is exhausted.
    fn create_list(
        &self,
        user_id: UserId,
        title: &str,
        description: &str,
        cards_json: &str,
        created_at: i64,
    ) -> Result<ListRow>;

    /// Fetches a list row by id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OperationFailed`] on database errors.
    fn get_list(&self, id: ListId) -> Result<Option<ListRow>>;

    /// Fetches a list row by its unique path.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OperationFailed`] on database errors.
    fn get_list_by_path(&self, path: &str) -> Result<Option<ListRow>>;

    /// Lists a user's list rows in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OperationFailed`] on database errors.
    fn lists_for_user(&self, user_id: UserId) -> Result<Vec<ListRow>>;

    /// Atomically rewrites one serialized column of a list row.
    ///
    /// The whole read-modify-write happens inside a single immediate
    /// transaction while the connection lock is held: `apply` receives the
    /// current raw column value and returns the replacement text, or `None`
    /// to leave the row untouched (idempotent no-op). Returns whether a write
    /// happened.
    ///
    /// Ownership is checked first: a missing row is
    /// [`crate::Error::NotFound`], a row owned by another user is
    /// [`crate::Error::Forbidden`]. Errors returned by `apply` roll the
    /// transaction back.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`], [`crate::Error::Forbidden`], any
    /// error from `apply`, or [`crate::Error::OperationFailed`] on database
    /// errors.
    fn update_list_column(
        &self,
        list_id: ListId,
        user_id: UserId,
        column: ListColumn,
        apply: &mut dyn FnMut(Option<&str>) -> Result<Option<String>>,
    ) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_column_names() {
        assert_eq!(ListColumn::Cards.name(), "cards");
        assert_eq!(ListColumn::Folders.name(), "folders");
        assert_eq!(ListColumn::Keywords.name(), "keywords");
    }

    #[test]
    fn test_list_row_decode_with_absent_columns() {
        let row = ListRow {
            id: ListId::new(1),
            title: "French basics".to_string(),
            description: String::new(),
            cards: Some(r#"[{"id":1,"term":"dog","definition":"chien"}]"#.to_string()),
            folders: None,
            keywords: None,
            path: "french-basics_1".to_string(),
            user_id: UserId::new(1),
            creation_date: 0,
        };

        let list = row.decode().unwrap();
        assert_eq!(list.cards.len(), 1);
        assert!(list.folders.is_empty());
        assert!(list.keywords.is_empty());
    }
}
