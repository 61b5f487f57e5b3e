//! URL-safe path derivation for lists and folders.
//!
//! Paths have the form `<slug>_<n>` where the slug is derived from the title
//! or folder name and `n` is a sequence number. Uniqueness is enforced by a
//! UNIQUE constraint in the store, with a bounded retry on collision; the
//! original count-based derivation raced under concurrent creation.

/// Lowercases a name and maps every non-alphanumeric run to a single hyphen.
///
/// An all-symbol name degrades to `"untitled"` so the path never starts with
/// the separator.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            // Some lowercase expansions carry combining marks ('İ' becomes
            // "i" + U+0307); keep only the alphanumeric part so slugifying
            // a slug changes nothing.
            for lower in c.to_lowercase().filter(|lc| lc.is_alphanumeric()) {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        slug.push_str("untitled");
    }
    slug
}

/// Formats the stored path for a slug and sequence number.
#[must_use]
pub fn path_for(slug: &str, sequence: i64) -> String {
    format!("{slug}_{sequence}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("French Basics", "french-basics"; "spaces become hyphens")]
    #[test_case("Verbs", "verbs"; "plain word lowercased")]
    #[test_case("C'est la vie!", "c-est-la-vie"; "punctuation collapsed")]
    #[test_case("  padded  ", "padded"; "leading and trailing runs dropped")]
    #[test_case("日本語 N5", "日本語-n5"; "non-ascii kept")]
    #[test_case("!!!", "untitled"; "all symbols degrade")]
    #[test_case("İstanbul", "istanbul"; "combining mark in lowercase expansion dropped")]
    fn test_slugify(input: &str, expected: &str) {
        assert_eq!(slugify(input), expected);
    }

    #[test]
    fn test_path_for() {
        assert_eq!(path_for("french-basics", 4), "french-basics_4");
    }
}
