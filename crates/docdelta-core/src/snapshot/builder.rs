//! Snapshot construction from a finished content manifest.

use crate::errors::{ExError, ExErrorKind, Result};
use crate::snapshot::digest::compute_content_hash;
use crate::snapshot::model::{PageMetadata, Snapshot};
use crate::snapshot::tokens::{EstimatingTokenCounter, TokenCounter};
use crate::{log_op_end, log_op_error, log_op_start};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::time::Instant;

/// One page of the finished catalog as handed over by the collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub path: String,
    /// Full page content; only its hash and token count are kept
    pub content: String,
    pub title: String,
    pub tags: Vec<String>,
}

impl ManifestEntry {
    pub fn new(
        path: impl Into<String>,
        content: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            title: title.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Format a snapshot id for the given instant.
///
/// UTC ISO-8601 with microsecond precision, so lexicographic order of ids is
/// chronological order.
pub fn snapshot_id_for(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Build a snapshot with a fresh id from the current time.
///
/// See [`build_snapshot_at`].
///
/// # Errors
///
/// Returns `DuplicatePath` if two entries claim the same path.
pub fn build_snapshot(
    entries: &[ManifestEntry],
    source_versions: BTreeMap<String, String>,
    counter: Option<&dyn TokenCounter>,
) -> Result<Snapshot> {
    build_snapshot_at(entries, source_versions, counter, Utc::now())
}

/// Build a snapshot stamped with `generated_at`.
///
/// For each entry the content hash is computed over normalized content and the
/// token count comes from `counter`, falling back to the chars/4 estimate when
/// no counter is supplied.
///
/// # Errors
///
/// Returns `DuplicatePath` if two entries claim the same path; nothing is
/// built in that case.
pub fn build_snapshot_at(
    entries: &[ManifestEntry],
    source_versions: BTreeMap<String, String>,
    counter: Option<&dyn TokenCounter>,
    generated_at: DateTime<Utc>,
) -> Result<Snapshot> {
    let start = Instant::now();
    let snapshot_id = snapshot_id_for(generated_at);
    log_op_start!(
        "build_snapshot",
        snapshot_id = %snapshot_id,
        page_count = entries.len()
    );

    let counter = counter.unwrap_or(&EstimatingTokenCounter);

    let mut page_manifest: BTreeMap<String, PageMetadata> = BTreeMap::new();
    for entry in entries {
        if page_manifest.contains_key(&entry.path) {
            let err = ExError::new(ExErrorKind::DuplicatePath)
                .with_op("build_snapshot")
                .with_path(&entry.path)
                .with_message("two manifest entries claim the same path");
            log_op_error!(
                "build_snapshot",
                &err,
                duration_ms = start.elapsed().as_millis() as u64
            );
            return Err(err);
        }

        page_manifest.insert(
            entry.path.clone(),
            PageMetadata {
                content_hash: compute_content_hash(&entry.content),
                token_count: counter.count_tokens(&entry.content),
                title: entry.title.clone(),
                tags: entry.tags.clone(),
            },
        );
    }

    let snapshot = Snapshot::new(snapshot_id, generated_at, source_versions, page_manifest);

    log_op_end!(
        "build_snapshot",
        duration_ms = start.elapsed().as_millis() as u64,
        snapshot_id = %snapshot.id(),
        page_count = snapshot.len()
    );
    Ok(snapshot)
}
