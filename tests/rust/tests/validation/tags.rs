//! Tag normalization properties

use mcpdir_core::{is_valid_tag, normalize_tag, normalize_tags, MAX_TAGS};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalize_is_idempotent(s in "\\PC*") {
        let once = normalize_tag(&s);
        prop_assert_eq!(normalize_tag(&once), once);
    }

    #[test]
    fn normalize_is_idempotent_with_whitespace(s in "[ \\t\\nA-Za-z0-9_-]{0,40}") {
        let once = normalize_tag(&s);
        prop_assert_eq!(normalize_tag(&once), once);
    }

    #[test]
    fn valid_iff_normalized_non_empty(s in "[ \\t\\na-zA-Z]{0,20}") {
        prop_assert_eq!(is_valid_tag(&s), !normalize_tag(&s).is_empty());
    }

    #[test]
    fn bulk_output_is_bounded_and_unique(tags in proptest::collection::vec("[ a-cA-C]{0,3}", 0..30)) {
        let normalized = normalize_tags(&tags);
        prop_assert!(normalized.len() <= MAX_TAGS);
        for (i, tag) in normalized.iter().enumerate() {
            prop_assert!(!tag.is_empty());
            prop_assert_eq!(normalize_tag(tag), tag.clone());
            prop_assert!(!normalized[i + 1..].contains(tag));
        }
    }
}

#[test]
fn test_normalize_examples() {
    assert_eq!(normalize_tag("  GitHub  "), "github");
    assert_eq!(normalize_tag("\tapi\n"), "api");
    assert_eq!(normalize_tag("   "), "");
}

#[test]
fn test_case_variants_collapse() {
    assert_eq!(normalize_tags(["GitHub", "github", "GITHUB"]), vec!["github"]);
}

#[test]
fn test_blank_tags_filtered() {
    let tags = ["github", "", "  ", "api", "\t"];
    let filtered: Vec<String> = tags
        .iter()
        .filter(|t| is_valid_tag(t))
        .map(|t| normalize_tag(t))
        .collect();
    assert_eq!(filtered, vec!["github", "api"]);
    assert_eq!(normalize_tags(tags), vec!["github", "api"]);
}

#[test]
fn test_dedup_happens_before_truncation() {
    // 12 raw entries, 11 unique: the duplicate must not consume a slot
    let mut tags = vec!["a".to_string(), "A".to_string()];
    tags.extend((0..10).map(|i| format!("t{}", i)));

    let normalized = normalize_tags(&tags);
    assert_eq!(normalized.len(), MAX_TAGS);
    assert_eq!(normalized[0], "a");
    assert_eq!(normalized[1], "t0");
    assert_eq!(normalized[9], "t8");
}
