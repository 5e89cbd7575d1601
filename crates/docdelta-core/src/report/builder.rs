//! Report assembly: diff → classify → bucket by tier.

use crate::classify::{classify, Severity, SeverityRules};
use crate::diff::archive::ArchivedContent;
use crate::diff::engine::compute_changes;
use crate::diff::model::{ChangeSet, ChangeType, RawChange};
use crate::diff::preview::{truncate_preview, DEFAULT_PREVIEW_CHARS};
use crate::errors::Result;
use crate::report::model::{ChangeEntry, DiffReport};
use crate::report::summary::{count_summary, section_for_path, Summarizer};
use crate::snapshot::model::Snapshot;
use crate::{log_op_degraded, log_op_end, log_op_error, log_op_start};
use chrono::{DateTime, Utc};
use std::time::Instant;

/// Builds a [`DiffReport`] from two snapshots.
///
/// ```ignore
/// let report = ReportBuilder::new(&rules)
///     .archive(&archive)
///     .build(Some(&previous), &current)?;
/// ```
pub struct ReportBuilder<'a> {
    rules: &'a SeverityRules,
    archive: Option<&'a dyn ArchivedContent>,
    summarizer: Option<&'a dyn Summarizer>,
    generated_at: Option<DateTime<Utc>>,
    preview_chars: usize,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(rules: &'a SeverityRules) -> Self {
        Self {
            rules,
            archive: None,
            summarizer: None,
            generated_at: None,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }

    /// Archived raw content used for diff previews and breaking-signal scans
    pub fn archive(mut self, archive: &'a dyn ArchivedContent) -> Self {
        self.archive = Some(archive);
        self
    }

    pub fn summarizer(mut self, summarizer: &'a dyn Summarizer) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// Pin the report timestamp (defaults to now)
    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    pub fn preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }

    /// Diff `old` (None on a first build) against `new` and classify the result.
    ///
    /// # Errors
    ///
    /// Propagates non-degradable archive errors from the diff engine or the
    /// summarizer's content lookups.
    pub fn build(&self, old: Option<&Snapshot>, new: &Snapshot) -> Result<DiffReport> {
        let change_set = compute_changes(old, new, self.archive)?;
        self.build_from_changes(change_set)
    }

    /// Classify an already computed change set.
    ///
    /// # Errors
    ///
    /// Propagates non-degradable archive errors raised while gathering text for
    /// the summarizer.
    pub fn build_from_changes(&self, change_set: ChangeSet) -> Result<DiffReport> {
        let start = Instant::now();
        log_op_start!(
            "build_report",
            snapshot_id = %change_set.current_snapshot,
            change_count = change_set.changes.len()
        );

        match self.assemble(change_set) {
            Ok(report) => {
                log_op_end!(
                    "build_report",
                    duration_ms = start.elapsed().as_millis() as u64,
                    snapshot_id = %report.current_snapshot,
                    breaking = report.breaking_changes.len(),
                    important = report.important_changes.len(),
                    informational = report.informational_changes.len(),
                    cosmetic = report.cosmetic_changes.len()
                );
                Ok(report)
            }
            Err(e) => {
                log_op_error!(
                    "build_report",
                    &e,
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(e)
            }
        }
    }

    fn assemble(&self, change_set: ChangeSet) -> Result<DiffReport> {
        let mut breaking = Vec::new();
        let mut important = Vec::new();
        let mut informational = Vec::new();
        let mut cosmetic = Vec::new();

        // Changes arrive path-sorted; pushing in order keeps each tier sorted.
        for change in &change_set.changes {
            let entry = self.entry_for(change);
            match entry.severity {
                Severity::Breaking => breaking.push(entry),
                Severity::Important => important.push(entry),
                Severity::Informational => informational.push(entry),
                Severity::Cosmetic => cosmetic.push(entry),
            }
        }

        let mut summary = count_summary(&breaking, &important, &change_set.stats);
        let notes = self.summarizer_notes(&change_set.changes)?;
        if !notes.is_empty() {
            summary.push('\n');
            summary.push_str(&notes.join("\n"));
        }

        Ok(DiffReport {
            generated_at: self.generated_at.unwrap_or_else(Utc::now),
            previous_snapshot: change_set.previous_snapshot,
            current_snapshot: change_set.current_snapshot,
            summary: Some(summary),
            stats: change_set.stats,
            breaking_changes: breaking,
            important_changes: important,
            informational_changes: informational,
            cosmetic_changes: cosmetic,
        })
    }

    fn entry_for(&self, change: &RawChange) -> ChangeEntry {
        let diff_text = change.diff_text.as_deref();
        let severity = classify(change, diff_text, self.rules);
        let title_text = change.display_title();

        let (title, mut details) = match change.change_type {
            ChangeType::Added => (
                format!("New {}", title_text),
                format!("Added new page: {}", title_text),
            ),
            ChangeType::Removed => (
                format!("Removed {}", title_text),
                format!("Removed page: {}", title_text),
            ),
            ChangeType::Modified | ChangeType::Unchanged => (
                format!("Updated {}", title_text),
                format!(
                    "Modified content in {} ({} → {} tokens)",
                    title_text,
                    change.old_token_count.unwrap_or(0),
                    change.new_token_count.unwrap_or(0)
                ),
            ),
        };
        if let Some(signal) = diff_text.and_then(|t| self.rules.find_breaking_signal(t)) {
            details.push_str(&format!("; mentions \"{}\"", signal));
        }

        ChangeEntry {
            change_type: change.change_type,
            severity,
            path: change.path.clone(),
            section: section_for_path(&change.path),
            title,
            details,
            diff_preview: change
                .unified_diff
                .as_deref()
                .map(|d| truncate_preview(d, self.preview_chars)),
            old_hash: change.old_hash.clone(),
            new_hash: change.new_hash.clone(),
            old_token_count: change.old_token_count,
            new_token_count: change.new_token_count,
        }
    }

    /// `- `path`: note` lines from the summarizer, in path order.
    fn summarizer_notes(&self, changes: &[RawChange]) -> Result<Vec<String>> {
        let (Some(summarizer), Some(archive)) = (self.summarizer, self.archive) else {
            return Ok(Vec::new());
        };

        let mut notes = Vec::new();
        for change in changes {
            if change.change_type != ChangeType::Modified {
                continue;
            }
            let (Some(old_hash), Some(new_hash)) = (&change.old_hash, &change.new_hash) else {
                continue;
            };
            let (Some(old_text), Some(new_text)) = (
                fetch_for_summary(archive, &change.path, old_hash)?,
                fetch_for_summary(archive, &change.path, new_hash)?,
            ) else {
                continue;
            };
            if let Some(note) = summarizer.summarize(&old_text, &new_text) {
                let note = note.trim();
                if !note.is_empty() {
                    notes.push(format!("- `{}`: {}", change.path, note));
                }
            }
        }
        Ok(notes)
    }
}

fn fetch_for_summary(
    archive: &dyn ArchivedContent,
    path: &str,
    content_hash: &str,
) -> Result<Option<String>> {
    match archive.fetch(content_hash) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind().is_degradable() => {
            log_op_degraded!("build_report", &e, path = %path, "skipping summary note");
            Ok(None)
        }
        Err(e) => Err(e.with_path(path)),
    }
}
