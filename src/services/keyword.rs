//! Keyword tag service.
//!
//! Keywords live in a list's serialized `keywords` column. Creation appends
//! with id `count + 1` (safe because no remove operation exists); toggling
//! rewrites one entry's `active` flag. Both run as atomic read-modify-writes
//! on the column.

use std::sync::Arc;

use crate::models::{Keyword, ListId, UserId};
use crate::storage::{ListColumn, StudyBackend};
use crate::{Error, Result, codec};

/// Service for list keywords.
pub struct KeywordService {
    backend: Arc<dyn StudyBackend>,
}

impl KeywordService {
    /// Creates a new keyword service with the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn StudyBackend>) -> Self {
        Self { backend }
    }

    /// Attaches a new active keyword to a list and returns it.
    ///
    /// Empty text aborts before anything is written. (The original flagged
    /// the empty value but wrote the row anyway.)
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for empty text, `NotFound`/`Forbidden` for a
    /// missing or non-owned list, `MalformedData` for a corrupt keyword
    /// column, or a storage error.
    pub fn create(&self, list_id: ListId, user_id: UserId, text: &str) -> Result<Keyword> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput(
                "keyword text must not be empty".to_string(),
            ));
        }

        let mut created = None;
        self.backend
            .update_list_column(list_id, user_id, ListColumn::Keywords, &mut |raw| {
                let mut keywords = codec::decode_keywords(raw)?;
                let id = u32::try_from(keywords.len() + 1).unwrap_or(u32::MAX);
                let keyword = Keyword::new(id, text);
                keywords.push(keyword.clone());
                created = Some(keyword);
                codec::encode_keywords(&keywords).map(Some)
            })?;

        // The closure always writes, so `created` is always set by now.
        let keyword = created.ok_or_else(|| Error::OperationFailed {
            operation: "create_keyword".to_string(),
            cause: "keyword column update did not run".to_string(),
        })?;

        tracing::info!(
            user_id = %user_id,
            list_id = %list_id,
            keyword_id = keyword.id,
            "Keyword created"
        );

        Ok(keyword)
    }

    /// Sets the `active` flag of one keyword, leaving all others untouched.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the list or the keyword id does not exist (the
    /// original silently rewrote the unchanged array), `Forbidden` for a
    /// non-owned list, `MalformedData` for a corrupt keyword column, or a
    /// storage error.
    pub fn set_active(
        &self,
        list_id: ListId,
        user_id: UserId,
        keyword_id: u32,
        active: bool,
    ) -> Result<()> {
        self.backend
            .update_list_column(list_id, user_id, ListColumn::Keywords, &mut |raw| {
                let mut keywords = codec::decode_keywords(raw)?;
                let Some(keyword) = keywords.iter_mut().find(|k| k.id == keyword_id) else {
                    return Err(Error::NotFound {
                        resource: "keyword",
                        id: i64::from(keyword_id),
                    });
                };
                if keyword.active == active {
                    return Ok(None);
                }
                keyword.active = active;
                codec::encode_keywords(&keywords).map(Some)
            })?;

        tracing::info!(
            user_id = %user_id,
            list_id = %list_id,
            keyword_id,
            active,
            "Keyword toggled"
        );

        Ok(())
    }

    /// All keywords attached to a list, in creation order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing list, `Forbidden` for a non-owned
    /// list, `MalformedData` for a corrupt keyword column, or a storage
    /// error.
    pub fn for_list(&self, list_id: ListId, user_id: UserId) -> Result<Vec<Keyword>> {
        let row = self.backend.get_list(list_id)?.ok_or(Error::NotFound {
            resource: "list",
            id: list_id.get(),
        })?;
        if row.user_id != user_id {
            return Err(Error::Forbidden {
                resource: "list",
                id: list_id.get(),
                user_id: user_id.get(),
            });
        }
        codec::decode_keywords(row.keywords.as_deref())
    }
}
