//! Report types and their structured (JSON) record.

use crate::classify::Severity;
use crate::diff::model::{ChangeType, DiffStats};
use crate::errors::{ExError, ExErrorKind, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One page-level, severity-classified difference between two snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeEntry {
    pub change_type: ChangeType,
    pub severity: Severity,
    pub path: String,
    /// Human section name derived from the path
    pub section: String,
    pub title: String,
    pub details: String,
    pub diff_preview: Option<String>,
    pub old_hash: Option<String>,
    pub new_hash: Option<String>,
    pub old_token_count: Option<u64>,
    pub new_token_count: Option<u64>,
}

/// Severity-ranked change report between two snapshots.
///
/// Each tier list is sorted by path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffReport {
    pub generated_at: DateTime<Utc>,
    /// None when the current snapshot was the first build
    pub previous_snapshot: Option<String>,
    pub current_snapshot: String,
    pub summary: Option<String>,
    pub stats: DiffStats,
    pub breaking_changes: Vec<ChangeEntry>,
    pub important_changes: Vec<ChangeEntry>,
    pub informational_changes: Vec<ChangeEntry>,
    pub cosmetic_changes: Vec<ChangeEntry>,
}

impl DiffReport {
    /// Entries of one tier
    pub fn entries(&self, severity: Severity) -> &[ChangeEntry] {
        match severity {
            Severity::Breaking => &self.breaking_changes,
            Severity::Important => &self.important_changes,
            Severity::Informational => &self.informational_changes,
            Severity::Cosmetic => &self.cosmetic_changes,
        }
    }

    /// Every entry, most consequential tier first
    pub fn all_entries(&self) -> impl Iterator<Item = &ChangeEntry> {
        Severity::DESCENDING
            .into_iter()
            .flat_map(move |severity| self.entries(severity).iter())
    }

    pub fn total_changes(&self) -> usize {
        self.breaking_changes.len()
            + self.important_changes.len()
            + self.informational_changes.len()
            + self.cosmetic_changes.len()
    }

    pub fn has_breaking_changes(&self) -> bool {
        !self.breaking_changes.is_empty()
    }

    /// Encode the structured record.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if encoding fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("encode_report")
                .with_snapshot_id(&self.current_snapshot)
                .with_message(e.to_string())
        })
    }

    /// Decode a structured record.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the text is not a valid report record.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("decode_report")
                .with_message(e.to_string())
        })
    }
}
