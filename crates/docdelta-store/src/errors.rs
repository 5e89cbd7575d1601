//! Error handling for docdelta-store
//!
//! Wraps docdelta-core ExError with store-specific helpers

use docdelta_core::errors::{ExError, ExErrorKind};
use std::path::Path;
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Reasons a snapshot id cannot name a file in the store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotIdError {
    #[error("snapshot id is empty")]
    Empty,

    #[error("snapshot id `{0}` contains a path separator")]
    PathSeparator(String),

    #[error("snapshot id `{0}` contains `..`")]
    ParentReference(String),

    #[error("snapshot id `{0}` contains a control character")]
    ControlCharacter(String),
}

impl From<SnapshotIdError> for ExError {
    fn from(err: SnapshotIdError) -> Self {
        ExError::new(ExErrorKind::InvalidInput)
            .with_op("validate_snapshot_id")
            .with_message(err.to_string())
    }
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create an IO error carrying the file it concerns
pub fn io_error_at(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(format!("{}: {}", path.display(), err))
}

/// Create a snapshot-not-found error
pub fn snapshot_not_found(snapshot_id: &str) -> ExError {
    ExError::new(ExErrorKind::SnapshotNotFound)
        .with_op("load_snapshot")
        .with_snapshot_id(snapshot_id)
        .with_message("no stored snapshot with this id")
}

/// Create an error for a save that would overwrite an existing snapshot
pub fn immutability_violation(snapshot_id: &str) -> ExError {
    ExError::new(ExErrorKind::ImmutabilityViolation)
        .with_op("save_snapshot")
        .with_snapshot_id(snapshot_id)
        .with_message("a snapshot with this id is already stored")
}

/// Create an archive-miss error
pub fn archive_missing(content_hash: &str) -> ExError {
    ExError::new(ExErrorKind::ArchivedContentUnavailable)
        .with_op("fetch_archived_content")
        .with_message(format!("no archived content for hash {}", content_hash))
}

/// Create an error for a content hash that is not a hex digest
pub fn invalid_content_hash(content_hash: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("archive_content")
        .with_message(format!("`{}` is not a hex content hash", content_hash))
}
