//! Card editing service.
//!
//! The one post-creation mutation of card content: locate a card by its
//! stable id and overwrite both sides. The caller supplies both values even
//! when only one changes; an empty string for the untouched side would blank
//! it, so the edit form sends current values through.

use std::sync::Arc;

use crate::models::{ListId, UserId};
use crate::storage::{ListColumn, StudyBackend};
use crate::{Error, Result, codec};

/// Service for editing cards inside a list.
pub struct CardService {
    backend: Arc<dyn StudyBackend>,
}

impl CardService {
    /// Creates a new card service with the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn StudyBackend>) -> Self {
        Self { backend }
    }

    /// Overwrites one card's term and definition.
    ///
    /// Submitting two empty strings is a success no-op without touching the
    /// store (the edit form's "nothing entered" case). Otherwise both fields
    /// are overwritten unconditionally.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the list or the card id does not exist (the
    /// original silently rewrote the unchanged array), `Forbidden` for a
    /// non-owned list, `MalformedData` for a corrupt cards column, or a
    /// storage error.
    pub fn update(
        &self,
        list_id: ListId,
        user_id: UserId,
        card_id: u32,
        term: &str,
        definition: &str,
    ) -> Result<()> {
        if term.is_empty() && definition.is_empty() {
            return Ok(());
        }

        self.backend
            .update_list_column(list_id, user_id, ListColumn::Cards, &mut |raw| {
                let mut cards = codec::decode_cards(raw)?;
                let Some(card) = cards.iter_mut().find(|c| c.id == card_id) else {
                    return Err(Error::NotFound {
                        resource: "card",
                        id: i64::from(card_id),
                    });
                };
                card.term = term.to_string();
                card.definition = definition.to_string();
                codec::encode_cards(&cards).map(Some)
            })?;

        tracing::info!(
            user_id = %user_id,
            list_id = %list_id,
            card_id,
            "Card updated"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Card, NewCard};
    use crate::services::ListService;
    use crate::storage::SqliteStudyBackend;

    fn setup() -> (CardService, ListService, UserId, UserId) {
        let backend = Arc::new(SqliteStudyBackend::in_memory().expect("Failed to create backend"));
        let alice = backend
            .create_user("alice", "hash", 1_700_000_000)
            .expect("Failed to create user")
            .id;
        let bob = backend
            .create_user("bob", "hash", 1_700_000_000)
            .expect("Failed to create user")
            .id;
        (
            CardService::new(backend.clone()),
            ListService::new(backend),
            alice,
            bob,
        )
    }

    fn make_list(lists: &ListService, user: UserId) -> ListId {
        lists
            .create(
                user,
                "French",
                "",
                vec![NewCard::new("dog", "chien"), NewCard::new("cat", "chat")],
            )
            .expect("Failed to create list")
            .id
    }

    #[test]
    fn test_update_overwrites_both_sides_of_target_only() {
        let (cards, lists, alice, _) = setup();
        let list_id = make_list(&lists, alice);

        cards
            .update(list_id, alice, 2, "cat", "feline")
            .expect("update");

        let list = lists.get(list_id).expect("get list");
        assert_eq!(list.cards[0], Card::new(1, "dog", "chien"));
        assert_eq!(list.cards[1], Card::new(2, "cat", "feline"));
    }

    #[test]
    fn test_update_with_one_empty_side_blanks_it() {
        let (cards, lists, alice, _) = setup();
        let list_id = make_list(&lists, alice);

        cards.update(list_id, alice, 1, "dog", "").expect("update");

        let list = lists.get(list_id).expect("get list");
        assert_eq!(list.cards[0], Card::new(1, "dog", ""));
    }

    #[test]
    fn test_both_empty_is_a_success_noop() {
        let (cards, lists, alice, _) = setup();
        let list_id = make_list(&lists, alice);
        let before = lists.get(list_id).expect("get list").cards;

        cards.update(list_id, alice, 1, "", "").expect("update");

        assert_eq!(lists.get(list_id).expect("get list").cards, before);
        // A bogus list id succeeds too; the store is never consulted.
        cards.update(ListId::new(404), alice, 1, "", "").expect("update");
    }

    #[test]
    fn test_unknown_card_leaves_column_byte_identical() {
        let (cards, lists, alice, _) = setup();
        let list_id = make_list(&lists, alice);
        let before = lists.get(list_id).expect("get list").cards;

        let result = cards.update(list_id, alice, 99, "x", "y");
        assert!(matches!(
            result,
            Err(Error::NotFound { resource: "card", id: 99 })
        ));
        assert_eq!(lists.get(list_id).expect("get list").cards, before);
    }

    #[test]
    fn test_ownership_isolation() {
        let (cards, lists, alice, bob) = setup();
        let list_id = make_list(&lists, alice);

        let result = cards.update(list_id, bob, 1, "hund", "dog");
        assert!(matches!(result, Err(Error::Forbidden { .. })));

        let list = lists.get(list_id).expect("get list");
        assert_eq!(list.cards[0], Card::new(1, "dog", "chien"));
    }
}
