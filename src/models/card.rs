//! Flashcard wire type.

use serde::{Deserialize, Serialize};

/// A single term/definition flashcard inside a list.
///
/// The id is the card's 1-based sequence position at list creation time. Ids
/// are assigned once and never renumbered; there is no add/remove operation
/// after creation, only term/definition edits.
///
/// Field names match the serialized JSON stored in the `cards` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// 1-based position assigned at creation, stable for the list's lifetime.
    pub id: u32,
    /// The prompt side of the card.
    pub term: String,
    /// The answer side of the card.
    pub definition: String,
}

impl Card {
    /// Creates a card with the given id and content.
    #[must_use]
    pub fn new(id: u32, term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            id,
            term: term.into(),
            definition: definition.into(),
        }
    }

    /// Whether the card carries any content at all.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.term.is_empty() || !self.definition.is_empty()
    }
}
