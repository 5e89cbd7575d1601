//! Markdown rendering of classified diff reports.
//!
//! Every rendered report carries the same four tier sections in the same
//! order. An empty tier still renders its heading with a `_None detected_`
//! placeholder so downstream parsers can rely on a fixed shape.

use crate::classify::Severity;
use crate::diff::preview::{truncate_preview, DEFAULT_PREVIEW_CHARS};
use crate::report::model::{ChangeEntry, DiffReport};
use serde::Serialize;

/// Placeholder line for a tier with no entries
pub const EMPTY_SECTION_PLACEHOLDER: &str = "_None detected_";

/// Renderer knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Character budget for each diff preview
    pub preview_chars: usize,
    /// Cap on entries listed per tier; `None` lists everything
    pub max_entries_per_section: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            preview_chars: DEFAULT_PREVIEW_CHARS,
            max_entries_per_section: None,
        }
    }
}

/// Output of [`render`]: the human document plus the structured record it
/// was rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedChangelog {
    pub markdown: String,
    pub record: DiffReport,
}

/// Section heading for a tier.
pub fn tier_heading(severity: Severity) -> &'static str {
    match severity {
        Severity::Breaking => "🚨 Breaking Changes",
        Severity::Important => "⚠️ Important Changes",
        Severity::Informational => "ℹ️ Informational Changes",
        Severity::Cosmetic => "🎨 Cosmetic Changes",
    }
}

/// Render one report with default options.
pub fn render(report: &DiffReport) -> RenderedChangelog {
    render_with(report, &RenderOptions::default())
}

/// Render one report as a standalone document.
pub fn render_with(report: &DiffReport, options: &RenderOptions) -> RenderedChangelog {
    let mut out = String::new();
    out.push_str(&format!("# Changes in {}\n\n", report.current_snapshot));
    write_report_body(&mut out, report, options);

    RenderedChangelog {
        markdown: out,
        record: report.clone(),
    }
}

/// Render a newest-first list of reports as one changelog document.
///
/// Each report gets a `## YYYY-MM-DD` section (the first one marked
/// `(Latest Build)`) followed by a `---` separator.
pub fn render_changelog(reports: &[DiffReport], options: &RenderOptions) -> String {
    let mut out = String::from("# Changelog\n\n");
    if reports.is_empty() {
        out.push_str("_No builds recorded yet._\n");
        return out;
    }

    for (i, report) in reports.iter().enumerate() {
        out.push_str(&format!("## {}", report.generated_at.format("%Y-%m-%d")));
        if i == 0 {
            out.push_str(" (Latest Build)");
        }
        out.push_str("\n\n");
        write_report_body(&mut out, report, options);
        out.push_str("---\n\n");
    }
    out
}

fn write_report_body(out: &mut String, report: &DiffReport, options: &RenderOptions) {
    let compared = match &report.previous_snapshot {
        Some(previous) => format!("`{}`", previous),
        None => "nothing (first build)".to_string(),
    };
    out.push_str(&format!(
        "> Compared against: {} | Added: {}, Modified: {}, Removed: {}, Unchanged: {}\n\n",
        compared,
        report.stats.added,
        report.stats.modified,
        report.stats.removed,
        report.stats.unchanged
    ));

    if let Some(summary) = report.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        out.push_str(summary.trim_end());
        out.push_str("\n\n");
    }

    for severity in Severity::DESCENDING {
        write_section(out, severity, report.entries(severity), options);
    }
}

fn write_section(
    out: &mut String,
    severity: Severity,
    entries: &[ChangeEntry],
    options: &RenderOptions,
) {
    out.push_str(&format!("### {}\n\n", tier_heading(severity)));
    if entries.is_empty() {
        out.push_str(EMPTY_SECTION_PLACEHOLDER);
        out.push_str("\n\n");
        return;
    }

    let shown = options
        .max_entries_per_section
        .map_or(entries.len(), |cap| cap.min(entries.len()));
    for entry in &entries[..shown] {
        write_entry(out, entry, options.preview_chars);
    }
    if shown < entries.len() {
        out.push_str(&format!("_...and {} more_\n", entries.len() - shown));
    }
    out.push('\n');
}

fn write_entry(out: &mut String, entry: &ChangeEntry, preview_chars: usize) {
    out.push_str(&format!(
        "- **{}** `{}` — {}: {}\n",
        entry.change_type.badge(),
        entry.path,
        entry.title,
        entry.details
    ));

    if let Some(preview) = entry.diff_preview.as_deref() {
        let preview = truncate_preview(preview, preview_chars);
        let fence = code_fence(&preview);
        out.push_str(&format!("  {}diff\n", fence));
        for line in preview.lines() {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&format!("  {}\n", fence));
    }
}

/// Backtick fence longer than any backtick run inside `body`, minimum three
fn code_fence(body: &str) -> String {
    let longest_run = body
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest_run.max(2) + 1)
}
