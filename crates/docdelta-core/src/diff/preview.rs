//! Unified-diff previews of archived page content.

use similar::{ChangeTag, TextDiff};

/// Default preview budget in characters
pub const DEFAULT_PREVIEW_CHARS: usize = 500;

const TRUNCATION_MARKER: &str = "\n...";

/// Unified diff (3 lines of context) between two versions of a page.
pub fn unified_diff(old_content: &str, new_content: &str) -> String {
    let text_diff = TextDiff::from_lines(old_content, new_content);
    text_diff
        .unified_diff()
        .context_radius(3)
        .header("previous", "current")
        .to_string()
}

/// Only the removed and inserted lines of a diff, each prefixed with `-`/`+`.
///
/// Breaking-signal phrases are matched against this text so that unchanged
/// context never escalates a change.
pub fn changed_lines(old_content: &str, new_content: &str) -> String {
    let text_diff = TextDiff::from_lines(old_content, new_content);
    let mut out = String::new();
    for change in text_diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => '-',
            ChangeTag::Insert => '+',
            ChangeTag::Equal => continue,
        };
        out.push(sign);
        out.push_str(change.value().trim_end_matches('\n'));
        out.push('\n');
    }
    out
}

/// Truncate to at most `max_chars` characters, marking the cut.
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unified_diff_marks_changed_lines() {
        let diff = unified_diff("a\nb\nc\n", "a\nB\nc\n");
        assert!(diff.contains("-b"));
        assert!(diff.contains("+B"));
        assert!(diff.contains("--- previous"));
    }

    #[test]
    fn test_changed_lines_excludes_context() {
        let text = changed_lines(
            "intro mentions removed fields\nlimit: 10\n",
            "intro mentions removed fields\nlimit: 20\n",
        );
        assert_eq!(text, "-limit: 10\n+limit: 20\n");
    }

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_preview("short", 500), "short");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "é".repeat(10);
        let out = truncate_preview(&text, 3);
        assert_eq!(out, format!("ééé{}", TRUNCATION_MARKER));
    }
}
