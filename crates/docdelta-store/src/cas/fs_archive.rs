//! Filesystem archive of raw page content, keyed by content hash
//!
//! The diff engine reads from here to produce previews and to scan changed
//! lines for breaking signals. Entries are write-once.

use crate::cas::atomic::{write_new, WriteOutcome};
use crate::cas::sharding::{is_hex_digest, shard_path};
use crate::errors::{archive_missing, invalid_content_hash, io_error_at, Result};
use docdelta_core::diff::ArchivedContent;
use docdelta_core::snapshot::compute_content_hash;
use docdelta_core::{log_op_end, log_op_error, log_op_start};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

const EXTENSION: &str = "txt";

/// Content archive rooted at a directory
#[derive(Debug, Clone)]
pub struct FsContentArchive {
    root: PathBuf,
}

impl FsContentArchive {
    /// Create an archive handle; nothing is touched on disk until the first put
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Archive `raw` under `content_hash`.
    ///
    /// Idempotent and first-writer-wins: returns `false` when an entry for the
    /// hash already exists, leaving it untouched. Raw texts that differ only in
    /// whitespace share a hash, so the first one archived is kept.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `content_hash` is not a hex digest, `Io` if the
    /// write fails.
    pub fn put(&self, content_hash: &str, raw: &str) -> Result<bool> {
        let start = Instant::now();
        log_op_start!("archive_put", content_hash = %content_hash, size_bytes = raw.len());

        match self.put_blob(content_hash, raw) {
            Ok(outcome) => {
                let created = outcome == WriteOutcome::Created;
                log_op_end!(
                    "archive_put",
                    duration_ms = start.elapsed().as_millis() as u64,
                    created = created
                );
                Ok(created)
            }
            Err(e) => {
                log_op_error!(
                    "archive_put",
                    &e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    content_hash = %content_hash
                );
                Err(e)
            }
        }
    }

    fn put_blob(&self, content_hash: &str, raw: &str) -> Result<WriteOutcome> {
        if !is_hex_digest(content_hash) {
            return Err(invalid_content_hash(content_hash));
        }
        write_new(&shard_path(&self.root, content_hash, EXTENSION), raw.as_bytes())
    }

    /// Archive `raw` under the hash a snapshot would record for it.
    ///
    /// # Errors
    ///
    /// As [`FsContentArchive::put`].
    pub fn put_content(&self, raw: &str) -> Result<String> {
        let content_hash = compute_content_hash(raw);
        self.put(&content_hash, raw)?;
        Ok(content_hash)
    }

    pub fn contains(&self, content_hash: &str) -> bool {
        is_hex_digest(content_hash) && shard_path(&self.root, content_hash, EXTENSION).is_file()
    }

    /// Read the archived raw text for `content_hash`.
    ///
    /// # Errors
    ///
    /// `ArchivedContentUnavailable` if nothing is archived under the hash,
    /// `Io` for other read failures.
    pub fn get(&self, content_hash: &str) -> Result<String> {
        let start = Instant::now();
        log_op_start!("archive_get", content_hash = %content_hash);

        match self.read_blob(content_hash) {
            Ok(text) => {
                log_op_end!(
                    "archive_get",
                    duration_ms = start.elapsed().as_millis() as u64,
                    size_bytes = text.len()
                );
                Ok(text)
            }
            // a miss is the caller's to report; it knows which page lost its preview
            Err(e) if e.kind().is_degradable() => {
                tracing::debug!(
                    op = "archive_get",
                    content_hash = %content_hash,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "no archived content"
                );
                Err(e)
            }
            Err(e) => {
                log_op_error!(
                    "archive_get",
                    &e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    content_hash = %content_hash
                );
                Err(e)
            }
        }
    }

    fn read_blob(&self, content_hash: &str) -> Result<String> {
        if !is_hex_digest(content_hash) {
            return Err(archive_missing(content_hash));
        }
        let path = shard_path(&self.root, content_hash, EXTENSION);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(archive_missing(content_hash)),
            Err(e) => Err(io_error_at("read_archived_content", &path, e)),
        }
    }
}

impl ArchivedContent for FsContentArchive {
    fn fetch(&self, content_hash: &str) -> Result<String> {
        self.get(content_hash)
    }
}
