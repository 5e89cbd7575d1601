//! Append-only filesystem snapshot store.
//!
//! One JSON record per snapshot, named after its percent-encoded id. `%`,
//! `:` and the characters some filesystems reserve are escaped, so distinct
//! ids always map to distinct file names.
//! Records are created with first-writer-wins semantics and never rewritten,
//! so readers need no locking.

use crate::cas::atomic::{write_new, WriteOutcome};
use crate::errors::{
    immutability_violation, io_error_at, snapshot_not_found, Result, SnapshotIdError,
};
use docdelta_core::errors::ExError;
use docdelta_core::snapshot::Snapshot;
use docdelta_core::{log_op_end, log_op_error, log_op_start};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

const RECORD_EXTENSION: &str = "json";

const RECORD_NAME_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b'%')
    .add(b':')
    .add(b'*')
    .add(b'?')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'|');

/// Durable snapshot persistence.
pub trait SnapshotStore {
    /// Persist a new snapshot.
    ///
    /// # Errors
    ///
    /// `ImmutabilityViolation` if a snapshot with the same id is already
    /// stored; the stored record is left untouched.
    fn save(&self, snapshot: &Snapshot) -> Result<()>;

    /// Exact lookup by id.
    ///
    /// # Errors
    ///
    /// `SnapshotNotFound` if absent, `MalformedSnapshot` if the stored record
    /// does not parse.
    fn load(&self, snapshot_id: &str) -> Result<Snapshot>;

    /// Up to `n` most recent snapshots, newest first (descending id order).
    ///
    /// # Errors
    ///
    /// `MalformedSnapshot` if any stored record does not parse; a corrupt
    /// record is never skipped.
    fn load_latest(&self, n: usize) -> Result<Vec<Snapshot>>;
}

/// Check that an id can name a record file inside the store root.
///
/// # Errors
///
/// Returns the [`SnapshotIdError`] describing the first problem found.
pub fn validate_snapshot_id(snapshot_id: &str) -> std::result::Result<(), SnapshotIdError> {
    if snapshot_id.is_empty() {
        return Err(SnapshotIdError::Empty);
    }
    if snapshot_id.contains(|c: char| c == '/' || c == '\\') {
        return Err(SnapshotIdError::PathSeparator(snapshot_id.to_string()));
    }
    if snapshot_id.contains("..") {
        return Err(SnapshotIdError::ParentReference(snapshot_id.to_string()));
    }
    if snapshot_id.chars().any(char::is_control) {
        return Err(SnapshotIdError::ControlCharacter(snapshot_id.to_string()));
    }
    Ok(())
}

/// Snapshot store backed by a directory of JSON records
#[derive(Debug, Clone)]
pub struct FsSnapshotStore {
    root: PathBuf,
}

impl FsSnapshotStore {
    /// Create a store handle; the directory is created on first save
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, snapshot_id: &str) -> PathBuf {
        self.root.join(format!(
            "{}.{}",
            utf8_percent_encode(snapshot_id, RECORD_NAME_ENCODE_SET),
            RECORD_EXTENSION
        ))
    }

    fn read_record(path: &Path) -> Result<Snapshot> {
        let bytes = fs::read(path).map_err(|e| io_error_at("read_snapshot", path, e))?;
        Snapshot::from_json_slice(&bytes)
            .map_err(|e| e.with_path(path.display().to_string()))
    }

    /// Every record file in the store root; empty if the root does not exist yet
    fn record_files(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error_at("list_snapshots", &self.root, e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| io_error_at("list_snapshots", &self.root, e))?
                .path();
            let is_record = path.is_file()
                && path.extension().and_then(|e| e.to_str()) == Some(RECORD_EXTENSION);
            if is_record {
                files.push(path);
            }
        }
        Ok(files)
    }

    fn save_record(&self, snapshot: &Snapshot) -> Result<()> {
        validate_snapshot_id(snapshot.id()).map_err(ExError::from)?;
        let json = snapshot.to_json_pretty()?;
        match write_new(&self.record_path(snapshot.id()), json.as_bytes())? {
            WriteOutcome::Created => Ok(()),
            WriteOutcome::AlreadyExists => Err(immutability_violation(snapshot.id())),
        }
    }

    fn load_record(&self, snapshot_id: &str) -> Result<Snapshot> {
        validate_snapshot_id(snapshot_id).map_err(ExError::from)?;
        let path = self.record_path(snapshot_id);
        if !path.is_file() {
            return Err(snapshot_not_found(snapshot_id));
        }
        let snapshot = Self::read_record(&path)?;
        // a record renamed by hand must not answer for another id
        if snapshot.id() != snapshot_id {
            return Err(snapshot_not_found(snapshot_id));
        }
        Ok(snapshot)
    }

    fn load_latest_records(&self, n: usize) -> Result<Vec<Snapshot>> {
        let mut snapshots = self
            .record_files()?
            .iter()
            .map(|path| Self::read_record(path))
            .collect::<Result<Vec<_>>>()?;
        snapshots.sort_by(|a, b| b.id().cmp(a.id()));
        snapshots.truncate(n);
        Ok(snapshots)
    }
}

impl SnapshotStore for FsSnapshotStore {
    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let start = Instant::now();
        log_op_start!("save_snapshot", snapshot_id = %snapshot.id());

        match self.save_record(snapshot) {
            Ok(()) => {
                log_op_end!(
                    "save_snapshot",
                    duration_ms = start.elapsed().as_millis() as u64,
                    snapshot_id = %snapshot.id(),
                    page_count = snapshot.len()
                );
                Ok(())
            }
            Err(e) => {
                log_op_error!(
                    "save_snapshot",
                    &e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    snapshot_id = %snapshot.id()
                );
                Err(e)
            }
        }
    }

    fn load(&self, snapshot_id: &str) -> Result<Snapshot> {
        let start = Instant::now();
        log_op_start!("load_snapshot", snapshot_id = %snapshot_id);

        match self.load_record(snapshot_id) {
            Ok(snapshot) => {
                log_op_end!(
                    "load_snapshot",
                    duration_ms = start.elapsed().as_millis() as u64,
                    snapshot_id = %snapshot_id
                );
                Ok(snapshot)
            }
            Err(e) => {
                log_op_error!(
                    "load_snapshot",
                    &e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    snapshot_id = %snapshot_id
                );
                Err(e)
            }
        }
    }

    fn load_latest(&self, n: usize) -> Result<Vec<Snapshot>> {
        let start = Instant::now();
        log_op_start!("load_latest_snapshots", requested = n);

        match self.load_latest_records(n) {
            Ok(snapshots) => {
                log_op_end!(
                    "load_latest_snapshots",
                    duration_ms = start.elapsed().as_millis() as u64,
                    returned = snapshots.len()
                );
                Ok(snapshots)
            }
            Err(e) => {
                log_op_error!(
                    "load_latest_snapshots",
                    &e,
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_snapshot_id() {
        assert!(validate_snapshot_id("2026-10-16T08:30:00.000000Z").is_ok());
        assert_eq!(validate_snapshot_id(""), Err(SnapshotIdError::Empty));
        assert!(matches!(
            validate_snapshot_id("a/b"),
            Err(SnapshotIdError::PathSeparator(_))
        ));
        assert!(matches!(
            validate_snapshot_id("a\\b"),
            Err(SnapshotIdError::PathSeparator(_))
        ));
        assert!(matches!(
            validate_snapshot_id(".."),
            Err(SnapshotIdError::ParentReference(_))
        ));
        assert!(matches!(
            validate_snapshot_id("a\nb"),
            Err(SnapshotIdError::ControlCharacter(_))
        ));
    }

    #[test]
    fn test_record_path_escapes_colons() {
        let store = FsSnapshotStore::new("/snapshots");
        assert_eq!(
            store.record_path("2026-10-16T08:30:00.000000Z"),
            PathBuf::from("/snapshots/2026-10-16T08%3A30%3A00.000000Z.json")
        );
    }

    #[test]
    fn test_record_path_is_injective() {
        let store = FsSnapshotStore::new("/snapshots");
        let ids = ["build:1", "build-1", "build%3A1", "build%1"];
        let paths: std::collections::BTreeSet<PathBuf> =
            ids.iter().map(|id| store.record_path(id)).collect();
        assert_eq!(paths.len(), ids.len());
    }
}
