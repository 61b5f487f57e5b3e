//! Property-based tests for slugs and the column codec.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Slugs only contain lowercase alphanumerics and single hyphens
//! - Slugification is idempotent
//! - Serialized collections decode back to themselves
//! - Absent and blank columns decode to the empty collection

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use cardbox::codec;
use cardbox::models::{Card, Keyword, slug};
use proptest::prelude::*;

proptest! {
    /// Property: a slug never starts or ends with a hyphen and never
    /// contains two in a row.
    #[test]
    fn prop_slug_hyphens_are_single_and_interior(name in ".{0,64}") {
        let s = slug::slugify(&name);
        prop_assert!(!s.starts_with('-'));
        prop_assert!(!s.ends_with('-'));
        prop_assert!(!s.contains("--"));
        prop_assert!(!s.is_empty());
    }

    /// Property: slugs contain no uppercase ASCII.
    #[test]
    fn prop_slug_is_lowercase(name in ".{0,64}") {
        let s = slug::slugify(&name);
        prop_assert!(!s.chars().any(|c| c.is_ascii_uppercase()));
    }

    /// Property: slugifying a slug changes nothing.
    #[test]
    fn prop_slugify_is_idempotent(name in ".{0,64}") {
        let once = slug::slugify(&name);
        prop_assert_eq!(slug::slugify(&once), once);
    }

    /// Property: the path embeds the slug and sequence verbatim.
    #[test]
    fn prop_path_splits_back(seq in 1i64..10_000) {
        let path = slug::path_for("french-basics", seq);
        let (s, n) = path.rsplit_once('_').expect("path has separator");
        prop_assert_eq!(s, "french-basics");
        prop_assert_eq!(n.parse::<i64>().unwrap(), seq);
    }

    /// Property: cards survive an encode/decode cycle.
    #[test]
    fn prop_cards_round_trip(
        specs in prop::collection::vec(("\\PC{0,40}", "\\PC{0,40}"), 0..12)
    ) {
        let cards: Vec<Card> = specs
            .into_iter()
            .enumerate()
            .map(|(i, (term, definition))| {
                Card::new(u32::try_from(i + 1).unwrap(), term, definition)
            })
            .collect();
        let encoded = codec::encode_cards(&cards).expect("encode failed");
        let decoded = codec::decode_cards(Some(&encoded)).expect("decode failed");
        prop_assert_eq!(decoded, cards);
    }

    /// Property: keywords survive an encode/decode cycle, including the
    /// active flag.
    #[test]
    fn prop_keywords_round_trip(
        specs in prop::collection::vec(("\\PC{1,30}", any::<bool>()), 0..8)
    ) {
        let keywords: Vec<Keyword> = specs
            .into_iter()
            .enumerate()
            .map(|(i, (text, active))| {
                let mut k = Keyword::new(u32::try_from(i + 1).unwrap(), text);
                k.active = active;
                k
            })
            .collect();
        let encoded = codec::encode_keywords(&keywords).expect("encode failed");
        let decoded = codec::decode_keywords(Some(&encoded)).expect("decode failed");
        prop_assert_eq!(decoded, keywords);
    }

    /// Property: whitespace-only column text decodes as empty, same as NULL.
    #[test]
    fn prop_blank_columns_decode_empty(blank in "[ \\t\\n]{0,10}") {
        let decoded = codec::decode_cards(Some(&blank)).expect("decode failed");
        prop_assert!(decoded.is_empty());
        prop_assert!(codec::decode_cards(None).expect("decode failed").is_empty());
    }
}

#[test]
fn test_malformed_column_is_reported_with_its_name() {
    let err = codec::decode_keywords(Some("not json")).unwrap_err();
    match err {
        cardbox::Error::MalformedData { column, .. } => {
            assert_eq!(column, codec::KEYWORDS_COLUMN);
        },
        other => panic!("unexpected error: {other:?}"),
    }
}
