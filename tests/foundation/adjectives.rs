//! Integration tests for the adjective word algebra

use cqlc_foundation::Adjective;
use proptest::prelude::*;

// =============================================================================
// Construction
// =============================================================================

#[test]
fn parse_and_from_words_agree() {
    assert_eq!(
        Adjective::parse("big ugly"),
        Adjective::from_words(["big", "ugly"])
    );
    assert_eq!(Adjective::from("big-ugly"), Adjective::parse("big ugly"));
}

#[test]
fn collect_from_iterator() {
    let adjective: Adjective = "very big ugly".split(' ').collect();
    assert_eq!(adjective.len(), 3);
    assert_eq!(adjective.words()[2], "ugly");
}

#[test]
fn push_appends_a_word() {
    let mut adjective = Adjective::new();
    assert!(adjective.is_empty());
    adjective.push("ugly");
    adjective.push("old");
    assert_eq!(adjective.to_string(), "ugly old");
}

// =============================================================================
// Prefix / Suffix Algebra
// =============================================================================

#[test]
fn empty_adjective_is_prefix_and_suffix_of_anything() {
    let ugly = Adjective::parse("ugly");
    assert!(ugly.starts_with(&Adjective::new()));
    assert!(ugly.ends_with(&Adjective::new()));
    assert_eq!(ugly.strip_suffix(&Adjective::new()), Some(ugly.clone()));
}

#[test]
fn longer_pattern_never_matches() {
    let ugly = Adjective::parse("ugly");
    let big_ugly = Adjective::parse("big ugly");
    assert!(!ugly.ends_with(&big_ugly));
    assert_eq!(ugly.strip_prefix(&big_ugly), None);
}

#[test]
fn concat_is_word_wise() {
    let joined = Adjective::parse("big").concat(&Adjective::parse("ugly"));
    assert_eq!(joined.words(), ["big", "ugly"]);
}

// =============================================================================
// Properties
// =============================================================================

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

fn adjective() -> impl Strategy<Value = Adjective> {
    prop::collection::vec(word(), 0..4).prop_map(Adjective::from_words)
}

proptest! {
    #[test]
    fn strip_suffix_inverts_concat(head in adjective(), tail in adjective()) {
        let whole = head.concat(&tail);
        prop_assert!(whole.ends_with(&tail));
        prop_assert_eq!(whole.strip_suffix(&tail), Some(head));
    }

    #[test]
    fn strip_prefix_inverts_concat(head in adjective(), tail in adjective()) {
        let whole = head.concat(&tail);
        prop_assert!(whole.starts_with(&head));
        prop_assert_eq!(whole.strip_prefix(&head), Some(tail));
    }

    #[test]
    fn display_then_parse_is_identity(adj in adjective()) {
        prop_assert_eq!(Adjective::parse(&adj.to_string()), adj);
    }
}
