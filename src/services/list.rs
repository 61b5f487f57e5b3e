//! List creation and retrieval service.

use std::sync::Arc;

use crate::models::{Card, List, ListId, NewCard, UserId};
use crate::storage::{ListRow, StudyBackend};
use crate::{Error, Result, codec, current_timestamp};

/// Minimum number of submitted cards that must carry content.
const MIN_USABLE_CARDS: usize = 2;

/// Service for creating and reading lists.
///
/// Reads are unscoped (list pages are viewable by path, as in the original
/// application); all mutation paths live in the folder/keyword/card services
/// and are ownership-checked there.
pub struct ListService {
    backend: Arc<dyn StudyBackend>,
}

impl ListService {
    /// Creates a new list service with the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn StudyBackend>) -> Self {
        Self { backend }
    }

    /// Creates a list from submitted term/definition pairs.
    ///
    /// Every submitted card is stored, blank ones included, with its 1-based
    /// position as a stable id. Creation requires at least 2 cards with a
    /// non-empty term or definition; this is the intended rule the original
    /// form check mis-stated, applied uniformly to any card count.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the title is empty (`InvalidInput`)
    /// - fewer than 2 cards carry content (`InvalidInput`)
    /// - storage cannot be accessed
    pub fn create(
        &self,
        user_id: UserId,
        title: &str,
        description: &str,
        cards: Vec<NewCard>,
    ) -> Result<List> {
        if title.trim().is_empty() {
            return Err(Error::InvalidInput("title must not be empty".to_string()));
        }

        let usable = cards.iter().filter(|c| c.has_content()).count();
        if usable < MIN_USABLE_CARDS {
            return Err(Error::InvalidInput(format!(
                "a list needs at least {MIN_USABLE_CARDS} non-empty cards, got {usable}"
            )));
        }

        let cards: Vec<Card> = cards
            .into_iter()
            .enumerate()
            .map(|(i, c)| {
                let id = u32::try_from(i + 1).unwrap_or(u32::MAX);
                Card {
                    id,
                    term: c.term,
                    definition: c.definition,
                }
            })
            .collect();
        let cards_json = codec::encode_cards(&cards)?;

        let row = self.backend.create_list(
            user_id,
            title.trim(),
            description,
            &cards_json,
            current_timestamp(),
        )?;

        tracing::info!(
            user_id = %user_id,
            list_id = %row.id,
            path = %row.path,
            card_count = cards.len(),
            "List created"
        );

        row.decode()
    }

    /// Fetches a list by id, with all collections decoded.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such list exists, `MalformedData` if a
    /// serialized column is corrupt, or a storage error.
    pub fn get(&self, list_id: ListId) -> Result<List> {
        let row = self.backend.get_list(list_id)?.ok_or(Error::NotFound {
            resource: "list",
            id: list_id.get(),
        })?;
        row.decode()
    }

    /// Fetches a list by its unique path.
    ///
    /// # Errors
    ///
    /// Returns `MalformedData` if a serialized column is corrupt, or a
    /// storage error.
    pub fn get_by_path(&self, path: &str) -> Result<Option<List>> {
        self.backend
            .get_list_by_path(path)?
            .map(ListRow::decode)
            .transpose()
    }

    /// All of a user's lists in creation order, with collections decoded.
    ///
    /// # Errors
    ///
    /// Returns `MalformedData` if a serialized column is corrupt, or a
    /// storage error.
    pub fn for_user(&self, user_id: UserId) -> Result<Vec<List>> {
        self.backend
            .lists_for_user(user_id)?
            .into_iter()
            .map(ListRow::decode)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStudyBackend;
    use test_case::test_case;

    fn setup() -> (Arc<SqliteStudyBackend>, ListService, UserId) {
        let backend = Arc::new(SqliteStudyBackend::in_memory().expect("Failed to create backend"));
        let user = backend
            .create_user("alice", "hash", 1_700_000_000)
            .expect("Failed to create user");
        (backend.clone(), ListService::new(backend), user.id)
    }

    fn two_cards() -> Vec<NewCard> {
        vec![NewCard::new("dog", "chien"), NewCard::new("cat", "chat")]
    }

    #[test]
    fn test_create_assigns_positional_ids() {
        let (_, lists, user) = setup();

        let list = lists
            .create(user, "French basics", "Animal words", two_cards())
            .expect("Failed to create list");

        assert_eq!(list.cards.len(), 2);
        assert_eq!(list.cards[0], Card::new(1, "dog", "chien"));
        assert_eq!(list.cards[1], Card::new(2, "cat", "chat"));
        assert!(list.folders.is_empty());
        assert!(list.keywords.is_empty());
        assert_eq!(list.path, "french-basics_1");
    }

    #[test]
    fn test_create_keeps_blank_cards_with_their_positions() {
        let (_, lists, user) = setup();

        let list = lists
            .create(
                user,
                "Sparse",
                "",
                vec![
                    NewCard::new("dog", "chien"),
                    NewCard::default(),
                    NewCard::new("cat", "chat"),
                ],
            )
            .expect("Failed to create list");

        assert_eq!(list.cards.len(), 3);
        assert_eq!(list.cards[1].id, 2);
        assert!(!list.cards[1].has_content());
        assert_eq!(list.cards[2].id, 3);
    }

    #[test_case(Vec::new(); "no cards")]
    #[test_case(vec![NewCard::new("dog", "chien")]; "one card")]
    #[test_case(vec![NewCard::new("dog", "chien"), NewCard::default()]; "one usable of two")]
    #[test_case(vec![NewCard::new("a", ""), NewCard::default(), NewCard::default(), NewCard::default()]; "one usable of four")]
    fn test_create_rejects_fewer_than_two_usable_cards(cards: Vec<NewCard>) {
        let (_, lists, user) = setup();

        let result = lists.create(user, "Too small", "", cards);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_create_rejects_empty_title() {
        let (_, lists, user) = setup();

        let result = lists.create(user, "  ", "", two_cards());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_get_unknown_list_is_not_found() {
        let (_, lists, _) = setup();

        assert!(matches!(
            lists.get(ListId::new(404)),
            Err(Error::NotFound { resource: "list", id: 404 })
        ));
    }

    #[test]
    fn test_get_by_path_and_for_user() {
        let (_, lists, user) = setup();

        let created = lists
            .create(user, "French basics", "", two_cards())
            .expect("Failed to create list");

        let by_path = lists
            .get_by_path(&created.path)
            .expect("Lookup failed")
            .expect("List missing");
        assert_eq!(by_path.id, created.id);

        let all = lists.for_user(user).expect("Listing failed");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, created.id);
    }
}
