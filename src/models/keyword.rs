//! Keyword tag wire type.

use serde::{Deserialize, Serialize};

/// A user-defined tag attached to a list, with an independent active flag.
///
/// Ids are assigned as `count + 1` at creation. That is safe only because no
/// remove operation exists; removal would make count-based ids collide.
///
/// The serialized field name for the text is `keyword`, matching the JSON
/// stored in the `keywords` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    /// 1-based id assigned at creation.
    pub id: u32,
    /// The tag text.
    #[serde(rename = "keyword")]
    pub text: String,
    /// Whether the tag is currently active. New keywords start active.
    pub active: bool,
}

impl Keyword {
    /// Creates an active keyword with the given id and text.
    #[must_use]
    pub fn new(id: u32, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            active: true,
        }
    }
}
