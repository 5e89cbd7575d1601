//! Machine-readable changelog log: a newest-first list of report records.

use crate::errors::{ExError, ExErrorKind, Result};
use crate::render::changelog::{render_changelog, RenderOptions};
use crate::report::model::DiffReport;
use serde::{Deserialize, Serialize};

/// `{"reports": [...]}`, newest report first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogLog {
    pub reports: Vec<DiffReport>,
}

impl ChangelogLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend the newest report
    pub fn push_latest(&mut self, report: DiffReport) {
        self.reports.insert(0, report);
    }

    /// Up to `n` most recent reports
    pub fn latest(&self, n: usize) -> &[DiffReport] {
        &self.reports[..n.min(self.reports.len())]
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn render_markdown(&self, options: &RenderOptions) -> String {
        render_changelog(&self.reports, options)
    }

    /// # Errors
    ///
    /// Returns `Serialization` if encoding fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("encode_changelog_log")
                .with_message(e.to_string())
        })
    }

    /// # Errors
    ///
    /// Returns `Serialization` if the text is not a valid log record.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("decode_changelog_log")
                .with_message(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::DiffStats;
    use chrono::{TimeZone, Utc};

    fn report(id: &str) -> DiffReport {
        DiffReport {
            generated_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            previous_snapshot: None,
            current_snapshot: id.to_string(),
            summary: Some("No significant changes".to_string()),
            stats: DiffStats::default(),
            breaking_changes: Vec::new(),
            important_changes: Vec::new(),
            informational_changes: Vec::new(),
            cosmetic_changes: Vec::new(),
        }
    }

    #[test]
    fn test_push_latest_keeps_newest_first() {
        let mut log = ChangelogLog::new();
        log.push_latest(report("s1"));
        log.push_latest(report("s2"));
        assert_eq!(log.reports[0].current_snapshot, "s2");
        assert_eq!(log.latest(1).len(), 1);
        assert_eq!(log.latest(10).len(), 2);
    }

    #[test]
    fn test_json_shape() {
        let mut log = ChangelogLog::new();
        log.push_latest(report("s1"));
        let value: serde_json::Value =
            serde_json::from_str(&log.to_json_pretty().unwrap()).unwrap();
        assert_eq!(value["reports"][0]["current_snapshot"], "s1");
        assert!(value["reports"][0]["breaking_changes"].is_array());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = ChangelogLog::from_json_str("{\"reports\": 3}").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
    }
}
