//! Raw change records produced by the diff engine.

use serde::{Deserialize, Serialize};

/// How a path differs between two snapshots.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Modified,
    Removed,
    Unchanged,
}

impl ChangeType {
    /// Upper-case badge used in rendered changelogs
    pub fn badge(&self) -> &'static str {
        match self {
            ChangeType::Added => "ADDED",
            ChangeType::Modified => "MODIFIED",
            ChangeType::Removed => "REMOVED",
            ChangeType::Unchanged => "UNCHANGED",
        }
    }
}

/// One path-level difference, before severity classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawChange {
    pub path: String,
    pub change_type: ChangeType,
    pub old_hash: Option<String>,
    pub new_hash: Option<String>,
    pub old_token_count: Option<u64>,
    pub new_token_count: Option<u64>,
    /// Page title on the previous side (None if added)
    pub old_title: Option<String>,
    /// Page title on the current side (None if removed)
    pub new_title: Option<String>,
    /// Removed/inserted lines of the archived raw content; the classifier's
    /// breaking-signal input. Modified only, and only when both sides were
    /// archived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_text: Option<String>,
    /// Full unified diff backing the preview, untruncated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unified_diff: Option<String>,
}

impl RawChange {
    /// The most recent title known for this path
    pub fn display_title(&self) -> &str {
        self.new_title
            .as_deref()
            .or(self.old_title.as_deref())
            .unwrap_or(&self.path)
    }
}

/// Per-type counts over every compared path.
///
/// `added + modified + removed + unchanged` always equals the size of the
/// union of both snapshots' path sets.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffStats {
    pub added: usize,
    pub modified: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl DiffStats {
    pub fn total(&self) -> usize {
        self.added + self.modified + self.removed + self.unchanged
    }

    pub(crate) fn record(&mut self, change_type: ChangeType) {
        match change_type {
            ChangeType::Added => self.added += 1,
            ChangeType::Modified => self.modified += 1,
            ChangeType::Removed => self.removed += 1,
            ChangeType::Unchanged => self.unchanged += 1,
        }
    }
}

/// Output of one diff computation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeSet {
    /// None when the current snapshot was diffed against nothing (first build)
    pub previous_snapshot: Option<String>,
    pub current_snapshot: String,
    /// Added, Modified and Removed changes sorted by path; Unchanged paths are
    /// only counted
    pub changes: Vec<RawChange>,
    pub stats: DiffStats,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Paths carrying the given change type, in path order
    pub fn paths_of(&self, change_type: ChangeType) -> Vec<&str> {
        self.changes
            .iter()
            .filter(|c| c.change_type == change_type)
            .map(|c| c.path.as_str())
            .collect()
    }
}
