//! JSON codec for a list's serialized collections.
//!
//! A `lists` row stores its cards, folder memberships, and keywords as three
//! independent text columns, each holding a JSON array. This module is the
//! single place that raw column text becomes typed collections and back.
//!
//! Decoding is lenient about absence: a `NULL` or empty column yields an
//! empty collection, never an error (freshly created lists have no folder or
//! keyword column at all). Malformed text is [`Error::MalformedData`], which
//! the calling layer surfaces as a request failure.
//!
//! Encoding round-trips: `decode(encode(x)) == x` for any well-formed `x`.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::models::{Card, Keyword};
use crate::{Error, Result};

/// Column name reported in [`Error::MalformedData`] for cards.
pub const CARDS_COLUMN: &str = "cards";
/// Column name reported in [`Error::MalformedData`] for folder memberships.
pub const FOLDERS_COLUMN: &str = "folders";
/// Column name reported in [`Error::MalformedData`] for keywords.
pub const KEYWORDS_COLUMN: &str = "keywords";

fn decode_column<T: DeserializeOwned>(raw: Option<&str>, column: &'static str) -> Result<Vec<T>> {
    match raw {
        None => Ok(Vec::new()),
        Some(text) if text.trim().is_empty() => Ok(Vec::new()),
        Some(text) => serde_json::from_str(text).map_err(|e| Error::MalformedData {
            column,
            cause: e.to_string(),
        }),
    }
}

fn encode_column<T: Serialize>(values: &[T], column: &'static str) -> Result<String> {
    serde_json::to_string(values).map_err(|e| Error::MalformedData {
        column,
        cause: e.to_string(),
    })
}

/// Decodes the `cards` column.
///
/// # Errors
///
/// Returns [`Error::MalformedData`] if the text is present but not a valid
/// card array.
pub fn decode_cards(raw: Option<&str>) -> Result<Vec<Card>> {
    decode_column(raw, CARDS_COLUMN)
}

/// Encodes cards for the `cards` column.
///
/// # Errors
///
/// Returns [`Error::MalformedData`] if serialization fails.
pub fn encode_cards(cards: &[Card]) -> Result<String> {
    encode_column(cards, CARDS_COLUMN)
}

/// Decodes the `folders` column (folder-id strings).
///
/// # Errors
///
/// Returns [`Error::MalformedData`] if the text is present but not a valid
/// string array.
pub fn decode_folders(raw: Option<&str>) -> Result<Vec<String>> {
    decode_column(raw, FOLDERS_COLUMN)
}

/// Encodes folder memberships for the `folders` column.
///
/// # Errors
///
/// Returns [`Error::MalformedData`] if serialization fails.
pub fn encode_folders(folders: &[String]) -> Result<String> {
    encode_column(folders, FOLDERS_COLUMN)
}

/// Decodes the `keywords` column.
///
/// # Errors
///
/// Returns [`Error::MalformedData`] if the text is present but not a valid
/// keyword array.
pub fn decode_keywords(raw: Option<&str>) -> Result<Vec<Keyword>> {
    decode_column(raw, KEYWORDS_COLUMN)
}

/// Encodes keywords for the `keywords` column.
///
/// # Errors
///
/// Returns [`Error::MalformedData`] if serialization fails.
pub fn encode_keywords(keywords: &[Keyword]) -> Result<String> {
    encode_column(keywords, KEYWORDS_COLUMN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_column_decodes_empty() {
        assert!(decode_cards(None).unwrap().is_empty());
        assert!(decode_folders(None).unwrap().is_empty());
        assert!(decode_keywords(None).unwrap().is_empty());
    }

    #[test]
    fn test_empty_text_decodes_empty() {
        assert!(decode_cards(Some("")).unwrap().is_empty());
        assert!(decode_folders(Some("  ")).unwrap().is_empty());
    }

    #[test]
    fn test_cards_round_trip() {
        let cards = vec![Card::new(1, "dog", "chien"), Card::new(2, "cat", "chat")];
        let raw = encode_cards(&cards).unwrap();
        assert_eq!(decode_cards(Some(&raw)).unwrap(), cards);
    }

    #[test]
    fn test_keywords_round_trip() {
        let keywords = vec![Keyword::new(1, "verbs"), Keyword {
            id: 2,
            text: "nouns".to_string(),
            active: false,
        }];
        let raw = encode_keywords(&keywords).unwrap();
        assert_eq!(decode_keywords(Some(&raw)).unwrap(), keywords);
    }

    #[test]
    fn test_folders_round_trip() {
        let folders = vec!["3".to_string(), "12".to_string()];
        let raw = encode_folders(&folders).unwrap();
        assert_eq!(decode_folders(Some(&raw)).unwrap(), folders);
    }

    #[test]
    fn test_decode_accepts_original_wire_format() {
        let raw = r#"[{"id": 1, "term": "dog", "definition": "chien"}]"#;
        let cards = decode_cards(Some(raw)).unwrap();
        assert_eq!(cards, vec![Card::new(1, "dog", "chien")]);

        let raw = r#"[{"id": 1, "keyword": "verbs", "active": true}]"#;
        let keywords = decode_keywords(Some(raw)).unwrap();
        assert_eq!(keywords, vec![Keyword::new(1, "verbs")]);
    }

    #[test]
    fn test_malformed_text_is_an_error() {
        let err = decode_cards(Some("{not json")).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::MalformedData { column: "cards", .. }
        ));

        let err = decode_keywords(Some("[{\"id\": true}]")).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::MalformedData { column: "keywords", .. }
        ));
    }
}
