#![allow(clippy::unwrap_used, clippy::expect_used)]

use docdelta_core::classify::{classify, Severity, SeverityRules};
use docdelta_core::diff::{ChangeType, RawChange};
use proptest::prelude::*;

fn change(path: &str, change_type: ChangeType, old: Option<u64>, new: Option<u64>) -> RawChange {
    RawChange {
        path: path.to_string(),
        change_type,
        old_hash: old.map(|_| "old".to_string()),
        new_hash: new.map(|_| "new".to_string()),
        old_token_count: old,
        new_token_count: new,
        old_title: old.map(|_| "Page".to_string()),
        new_title: new.map(|_| "Page".to_string()),
        diff_text: None,
        unified_diff: None,
    }
}

fn informational_guides() -> SeverityRules {
    SeverityRules::builder()
        .prefix("guides/", Severity::Informational)
        .prefix("reference/", Severity::Important)
        .signal("deprecated")
        .build()
        .unwrap()
}

#[test]
fn test_removal_is_breaking_regardless_of_prefix() {
    let rules = informational_guides();
    let c = change("guides/old.md", ChangeType::Removed, Some(10), None);
    assert_eq!(classify(&c, None, &rules), Severity::Breaking);
}

#[test]
fn test_breaking_signal_beats_prefix_rule() {
    let rules = informational_guides();
    let c = change("guides/auth.md", ChangeType::Modified, Some(100), Some(100));
    assert_eq!(
        classify(&c, Some("+This flow is DEPRECATED as of v2\n"), &rules),
        Severity::Breaking
    );
    assert_eq!(classify(&c, None, &rules), Severity::Informational);
}

#[test]
fn test_prefix_rule_applies_to_additions() {
    let rules = informational_guides();
    let c = change("reference/limits.md", ChangeType::Added, None, Some(40));
    assert_eq!(classify(&c, None, &rules), Severity::Important);
}

#[test]
fn test_prefix_rule_beats_cosmetic_delta() {
    let rules = informational_guides();
    let c = change("reference/limits.md", ChangeType::Modified, Some(1000), Some(1001));
    assert_eq!(classify(&c, None, &rules), Severity::Important);
}

#[test]
fn test_unmatched_addition_is_informational() {
    let rules = informational_guides();
    let c = change("blog/post.md", ChangeType::Added, None, Some(3));
    assert_eq!(classify(&c, None, &rules), Severity::Informational);
}

#[test]
fn test_cosmetic_boundary() {
    let rules = informational_guides();
    let small = change("blog/post.md", ChangeType::Modified, Some(1000), Some(1030));
    let large = change("blog/post.md", ChangeType::Modified, Some(1000), Some(1300));
    assert_eq!(classify(&small, None, &rules), Severity::Cosmetic);
    assert_eq!(classify(&large, None, &rules), Severity::Informational);
}

#[test]
fn test_shrinking_page_uses_absolute_delta() {
    let rules = informational_guides();
    let c = change("blog/post.md", ChangeType::Modified, Some(1000), Some(600));
    assert_eq!(classify(&c, None, &rules), Severity::Informational);
}

#[test]
fn test_custom_threshold() {
    let rules = SeverityRules::builder()
        .cosmetic_threshold(0.5)
        .build()
        .unwrap();
    let c = change("blog/post.md", ChangeType::Modified, Some(1000), Some(1300));
    assert_eq!(classify(&c, None, &rules), Severity::Cosmetic);
}

#[test]
fn test_classification_is_deterministic() {
    let rules = SeverityRules::default();
    let c = change("api-reference/endpoint/chat.md", ChangeType::Modified, Some(10), Some(90));
    let first = classify(&c, Some("+new optional field\n"), &rules);
    for _ in 0..10 {
        assert_eq!(classify(&c, Some("+new optional field\n"), &rules), first);
    }
    assert_eq!(first, Severity::Important);
}

#[test]
fn test_stock_rules_deprecations_page_is_breaking() {
    let rules = SeverityRules::default();
    let c = change("overview/deprecations.md", ChangeType::Added, None, Some(50));
    assert_eq!(classify(&c, None, &rules), Severity::Breaking);
}

fn any_change_type() -> impl Strategy<Value = ChangeType> {
    prop_oneof![
        Just(ChangeType::Added),
        Just(ChangeType::Modified),
        Just(ChangeType::Removed),
        Just(ChangeType::Unchanged),
    ]
}

proptest! {
    #[test]
    fn prop_classify_is_deterministic(
        path in "(guides/|reference/|blog/)[a-z]{1,8}\\.md",
        change_type in any_change_type(),
        old in 0u64..5000,
        new in 0u64..5000,
        text in proptest::option::of("[ +a-zA-Z\n-]{0,40}"),
    ) {
        let rules = informational_guides();
        let c = change(&path, change_type, Some(old), Some(new));
        let first = classify(&c, text.as_deref(), &rules);
        prop_assert_eq!(classify(&c, text.as_deref(), &rules), first);
    }

    #[test]
    fn prop_removal_is_always_breaking(
        path in "(guides/|reference/|blog/)[a-z]{1,8}\\.md",
        old in 0u64..5000,
    ) {
        let rules = informational_guides();
        let c = change(&path, ChangeType::Removed, Some(old), None);
        prop_assert_eq!(classify(&c, None, &rules), Severity::Breaking);
    }

    #[test]
    fn prop_signal_in_diff_text_is_always_breaking(
        path in "(guides/|reference/|blog/)[a-z]{1,8}\\.md",
        old in 0u64..5000,
        new in 0u64..5000,
        prefix in "[a-z ]{0,20}",
    ) {
        let rules = informational_guides();
        let c = change(&path, ChangeType::Modified, Some(old), Some(new));
        let text = format!("+{}Deprecated\n", prefix);
        prop_assert_eq!(classify(&c, Some(&text), &rules), Severity::Breaking);
    }
}
