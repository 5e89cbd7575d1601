//! Free-text summary and naming helpers.

use crate::diff::model::DiffStats;
use crate::report::model::ChangeEntry;

/// Optional free-text summarization capability (e.g. an LLM client).
///
/// Only consulted for Modified pages whose old and new raw text are both
/// archived. Returning `None` means "nothing to add".
pub trait Summarizer {
    fn summarize(&self, old_text: &str, new_text: &str) -> Option<String>;
}

impl<F> Summarizer for F
where
    F: Fn(&str, &str) -> Option<String>,
{
    fn summarize(&self, old_text: &str, new_text: &str) -> Option<String> {
        self(old_text, new_text)
    }
}

/// Deterministic one-line summary from tier sizes and stats.
pub fn count_summary(
    breaking: &[ChangeEntry],
    important: &[ChangeEntry],
    stats: &DiffStats,
) -> String {
    let mut parts = Vec::new();
    if !breaking.is_empty() {
        parts.push(format!("{} breaking change(s)", breaking.len()));
    }
    if !important.is_empty() {
        parts.push(format!("{} important change(s)", important.len()));
    }
    if stats.added > 0 {
        parts.push(format!("{} new page(s)", stats.added));
    }
    if stats.removed > 0 {
        parts.push(format!("{} removed page(s)", stats.removed));
    }

    if parts.is_empty() {
        "No significant changes".to_string()
    } else {
        parts.join(", ")
    }
}

/// Readable section name for a page path.
///
/// `api-reference/endpoint/chat_completions.md` → `Api Reference > Endpoint > Chat Completions`
pub fn section_for_path(path: &str) -> String {
    let stem = path.strip_suffix(".md").unwrap_or(path);
    stem.split('/')
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.split(|c: char| c == '-' || c == '_')
                .filter(|w| !w.is_empty())
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(" > ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}
