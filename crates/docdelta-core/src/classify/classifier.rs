use crate::classify::rules::SeverityRules;
use crate::classify::severity::Severity;
use crate::diff::model::{ChangeType, RawChange};

/// Relative token-count delta of a change: `|new - old| / max(old, 1)`.
///
/// Missing counts are treated as zero.
pub fn relative_token_delta(change: &RawChange) -> f64 {
    let old = change.old_token_count.unwrap_or(0);
    let new = change.new_token_count.unwrap_or(0);
    old.abs_diff(new) as f64 / old.max(1) as f64
}

/// Assign a severity tier to a raw change.
///
/// Evaluation order, first match wins:
///
/// 1. `Removed`, or `diff_text` contains a breaking-signal phrase → Breaking
/// 2. path matches a prefix rule (and the change is not `Unchanged`) → that
///    rule's severity
/// 3. `Added` → Informational
/// 4. `Modified` with a relative token delta below the cosmetic threshold →
///    Cosmetic
/// 5. otherwise → Informational
///
/// Pure and total: no I/O, and identical inputs always give the same tier.
pub fn classify(change: &RawChange, diff_text: Option<&str>, rules: &SeverityRules) -> Severity {
    if change.change_type == ChangeType::Removed {
        return Severity::Breaking;
    }
    if diff_text.is_some_and(|text| rules.find_breaking_signal(text).is_some()) {
        return Severity::Breaking;
    }

    if change.change_type != ChangeType::Unchanged {
        if let Some(rule) = rules.match_prefix(&change.path) {
            return rule.severity;
        }
    }

    match change.change_type {
        ChangeType::Added => Severity::Informational,
        ChangeType::Modified if relative_token_delta(change) < rules.cosmetic_threshold() => {
            Severity::Cosmetic
        }
        _ => Severity::Informational,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modified(path: &str, old: u64, new: u64) -> RawChange {
        RawChange {
            path: path.to_string(),
            change_type: ChangeType::Modified,
            old_hash: Some("h1".to_string()),
            new_hash: Some("h2".to_string()),
            old_token_count: Some(old),
            new_token_count: Some(new),
            old_title: Some("Page".to_string()),
            new_title: Some("Page".to_string()),
            diff_text: None,
            unified_diff: None,
        }
    }

    #[test]
    fn test_relative_delta() {
        assert!((relative_token_delta(&modified("a.md", 1000, 1030)) - 0.03).abs() < 1e-9);
        assert!((relative_token_delta(&modified("a.md", 1000, 700)) - 0.3).abs() < 1e-9);
        // zero baseline divides by one
        assert_eq!(relative_token_delta(&modified("a.md", 0, 4)), 4.0);
    }

    #[test]
    fn test_delta_exactly_at_threshold_is_not_cosmetic() {
        let rules = SeverityRules::builder().build().unwrap();
        let change = modified("a.md", 100, 105);
        assert_eq!(classify(&change, None, &rules), Severity::Informational);
    }

    #[test]
    fn test_unchanged_ignores_prefix_rules() {
        let rules = SeverityRules::builder()
            .prefix("a", Severity::Important)
            .build()
            .unwrap();
        let mut change = modified("a.md", 10, 10);
        change.change_type = ChangeType::Unchanged;
        assert_eq!(classify(&change, None, &rules), Severity::Informational);
    }
}
