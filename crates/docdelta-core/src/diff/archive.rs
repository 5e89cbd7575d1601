//! Archived raw page content, keyed by content hash.

use crate::errors::{ExError, ExErrorKind, Result};
use std::collections::{BTreeMap, HashMap};

/// Read access to the raw text of previously built pages.
///
/// Implementations return `ArchivedContentUnavailable` when the text for a
/// hash was never archived; the diff engine treats that as "no preview".
pub trait ArchivedContent {
    /// Fetch the raw page text whose normalized form hashes to `content_hash`.
    ///
    /// # Errors
    ///
    /// `ArchivedContentUnavailable` for an unknown hash; other kinds for real
    /// read failures.
    fn fetch(&self, content_hash: &str) -> Result<String>;
}

fn unavailable(content_hash: &str) -> ExError {
    ExError::new(ExErrorKind::ArchivedContentUnavailable)
        .with_op("fetch_archived_content")
        .with_message(format!("no archived content for hash {}", content_hash))
}

impl ArchivedContent for BTreeMap<String, String> {
    fn fetch(&self, content_hash: &str) -> Result<String> {
        self.get(content_hash)
            .cloned()
            .ok_or_else(|| unavailable(content_hash))
    }
}

impl ArchivedContent for HashMap<String, String> {
    fn fetch(&self, content_hash: &str) -> Result<String> {
        self.get(content_hash)
            .cloned()
            .ok_or_else(|| unavailable(content_hash))
    }
}
