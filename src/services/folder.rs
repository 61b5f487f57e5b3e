//! Folder and folder-membership service.
//!
//! A list's folder memberships live in its serialized `folders` column as an
//! array of folder-id strings. Add/remove rewrite that array atomically via
//! [`StudyBackend::update_list_column`]; both are idempotent and report
//! whether anything changed.

use std::sync::Arc;

use crate::models::{Folder, FolderId, List, ListId, UserId};
use crate::storage::{ListColumn, ListRow, StudyBackend};
use crate::{Error, Result, codec, current_timestamp};

/// Filters decoded lists down to members of the given folder.
///
/// Membership is string-compared against the stored id array; duplicates are
/// dropped by list id. Pure function so the web layer can reuse an already
/// loaded collection.
#[must_use]
pub fn filter_by_folder(folder_id: FolderId, lists: &[List]) -> Vec<List> {
    let mut seen = std::collections::HashSet::new();
    lists
        .iter()
        .filter(|list| list.in_folder(folder_id) && seen.insert(list.id))
        .cloned()
        .collect()
}

/// Service for folders and list-folder membership.
pub struct FolderService {
    backend: Arc<dyn StudyBackend>,
}

impl FolderService {
    /// Creates a new folder service with the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn StudyBackend>) -> Self {
        Self { backend }
    }

    /// Creates a folder for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty (`InvalidInput`) or storage
    /// cannot be accessed.
    pub fn create(&self, user_id: UserId, name: &str) -> Result<Folder> {
        if name.trim().is_empty() {
            return Err(Error::InvalidInput(
                "folder name must not be empty".to_string(),
            ));
        }

        let folder = self
            .backend
            .create_folder(user_id, name.trim(), current_timestamp())?;

        tracing::info!(
            user_id = %user_id,
            folder_id = %folder.id,
            path = %folder.path,
            "Folder created"
        );

        Ok(folder)
    }

    /// Fetches a folder by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such folder exists, or a storage error.
    pub fn get(&self, folder_id: FolderId) -> Result<Folder> {
        self.backend.get_folder(folder_id)?.ok_or(Error::NotFound {
            resource: "folder",
            id: folder_id.get(),
        })
    }

    /// Fetches a folder by its unique path.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the lookup fails.
    pub fn get_by_path(&self, path: &str) -> Result<Option<Folder>> {
        self.backend.get_folder_by_path(path)
    }

    /// All of a user's folders in creation order.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the listing fails.
    pub fn for_user(&self, user_id: UserId) -> Result<Vec<Folder>> {
        self.backend.list_folders(user_id)
    }

    /// Adds a list to a folder. Idempotent: returns `false` if the list was
    /// already a member, `true` if the membership set changed.
    ///
    /// The folder must exist; the list must exist and belong to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing folder or list, `Forbidden` if the
    /// list belongs to another user, `MalformedData` for a corrupt membership
    /// column, or a storage error.
    pub fn add_list(&self, list_id: ListId, folder_id: FolderId, user_id: UserId) -> Result<bool> {
        // Referencing a folder that was never created is a caller bug the
        // original silently tolerated.
        self.get(folder_id)?;

        let entry = folder_id.to_string();
        let changed = self.backend.update_list_column(
            list_id,
            user_id,
            ListColumn::Folders,
            &mut |raw| {
                let mut members = codec::decode_folders(raw)?;
                if members.contains(&entry) {
                    return Ok(None);
                }
                members.push(entry.clone());
                codec::encode_folders(&members).map(Some)
            },
        )?;

        if changed {
            tracing::info!(
                user_id = %user_id,
                list_id = %list_id,
                folder_id = %folder_id,
                "List added to folder"
            );
        }

        Ok(changed)
    }

    /// Removes a list from a folder. Idempotent: returns `false` if the list
    /// was not a member.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing folder or list, `Forbidden` if the
    /// list belongs to another user, `MalformedData` for a corrupt membership
    /// column, or a storage error.
    pub fn remove_list(
        &self,
        list_id: ListId,
        folder_id: FolderId,
        user_id: UserId,
    ) -> Result<bool> {
        self.get(folder_id)?;

        let entry = folder_id.to_string();
        let changed = self.backend.update_list_column(
            list_id,
            user_id,
            ListColumn::Folders,
            &mut |raw| {
                let mut members = codec::decode_folders(raw)?;
                let before = members.len();
                members.retain(|m| *m != entry);
                if members.len() == before {
                    return Ok(None);
                }
                codec::encode_folders(&members).map(Some)
            },
        )?;

        if changed {
            tracing::info!(
                user_id = %user_id,
                list_id = %list_id,
                folder_id = %folder_id,
                "List removed from folder"
            );
        }

        Ok(changed)
    }

    /// All of a user's lists that are members of the given folder.
    ///
    /// # Errors
    ///
    /// Returns `MalformedData` if a list column is corrupt, or a storage
    /// error.
    pub fn lists_in_folder(&self, folder_id: FolderId, user_id: UserId) -> Result<Vec<List>> {
        let lists = self
            .backend
            .lists_for_user(user_id)?
            .into_iter()
            .map(ListRow::decode)
            .collect::<Result<Vec<_>>>()?;
        Ok(filter_by_folder(folder_id, &lists))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewCard;
    use crate::services::ListService;
    use crate::storage::SqliteStudyBackend;

    struct Fixture {
        folders: FolderService,
        lists: ListService,
        user: UserId,
        other_user: UserId,
    }

    fn setup() -> Fixture {
        let backend = Arc::new(SqliteStudyBackend::in_memory().expect("Failed to create backend"));
        let user = backend
            .create_user("alice", "hash", 1_700_000_000)
            .expect("Failed to create user")
            .id;
        let other_user = backend
            .create_user("bob", "hash", 1_700_000_000)
            .expect("Failed to create user")
            .id;
        Fixture {
            folders: FolderService::new(backend.clone()),
            lists: ListService::new(backend),
            user,
            other_user,
        }
    }

    fn make_list(fx: &Fixture, title: &str) -> List {
        fx.lists
            .create(
                fx.user,
                title,
                "",
                vec![NewCard::new("dog", "chien"), NewCard::new("cat", "chat")],
            )
            .expect("Failed to create list")
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let fx = setup();
        assert!(matches!(
            fx.folders.create(fx.user, "  "),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_add_is_idempotent() {
        let fx = setup();
        let folder = fx.folders.create(fx.user, "Verbs").expect("create folder");
        let list = make_list(&fx, "French");

        assert!(fx.folders.add_list(list.id, folder.id, fx.user).expect("add"));
        assert!(!fx.folders.add_list(list.id, folder.id, fx.user).expect("re-add"));

        let members = fx
            .folders
            .lists_in_folder(folder.id, fx.user)
            .expect("lists_in_folder");
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].folders, vec![folder.id.to_string()]);
    }

    #[test]
    fn test_add_then_remove_restores_membership() {
        let fx = setup();
        let folder = fx.folders.create(fx.user, "Verbs").expect("create folder");
        let other = fx.folders.create(fx.user, "Nouns").expect("create folder");
        let list = make_list(&fx, "French");

        fx.folders.add_list(list.id, folder.id, fx.user).expect("add");
        fx.folders.add_list(list.id, other.id, fx.user).expect("add");
        assert!(fx.folders.remove_list(list.id, folder.id, fx.user).expect("remove"));

        let refreshed = fx.lists.get(list.id).expect("get list");
        assert_eq!(refreshed.folders, vec![other.id.to_string()]);

        // Removing again is a no-op.
        assert!(!fx.folders.remove_list(list.id, folder.id, fx.user).expect("re-remove"));
    }

    #[test]
    fn test_add_unknown_folder_is_not_found() {
        let fx = setup();
        let list = make_list(&fx, "French");

        assert!(matches!(
            fx.folders.add_list(list.id, FolderId::new(404), fx.user),
            Err(Error::NotFound { resource: "folder", id: 404 })
        ));
    }

    #[test]
    fn test_remove_unknown_folder_is_not_found() {
        let fx = setup();
        let list = make_list(&fx, "French");

        assert!(matches!(
            fx.folders.remove_list(list.id, FolderId::new(404), fx.user),
            Err(Error::NotFound { resource: "folder", id: 404 })
        ));
    }

    #[test]
    fn test_ownership_isolation() {
        let fx = setup();
        let folder = fx.folders.create(fx.user, "Verbs").expect("create folder");
        let list = make_list(&fx, "French");

        let result = fx.folders.add_list(list.id, folder.id, fx.other_user);
        assert!(matches!(result, Err(Error::Forbidden { .. })));

        let refreshed = fx.lists.get(list.id).expect("get list");
        assert!(refreshed.folders.is_empty());
    }

    #[test]
    fn test_filter_by_folder_deduplicates() {
        let fx = setup();
        let folder = fx.folders.create(fx.user, "Verbs").expect("create folder");
        let list = make_list(&fx, "French");
        fx.folders.add_list(list.id, folder.id, fx.user).expect("add");

        let decoded = fx.lists.get(list.id).expect("get list");
        let doubled = vec![decoded.clone(), decoded];
        let filtered = filter_by_folder(folder.id, &doubled);
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_folder_lookup_by_path() {
        let fx = setup();
        let folder = fx.folders.create(fx.user, "Verbs").expect("create folder");

        let found = fx
            .folders
            .get_by_path(&folder.path)
            .expect("lookup")
            .expect("folder missing");
        assert_eq!(found.id, folder.id);
        assert!(fx.folders.get_by_path("missing_9").expect("lookup").is_none());
    }
}
