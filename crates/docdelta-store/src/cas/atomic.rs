//! All-or-nothing, first-writer-wins file creation
//!
//! Content goes to a named temp file in the destination directory, is synced,
//! and is then linked into place only if the destination does not exist yet.
//! The temp file is removed on every exit path when its handle drops.

use crate::errors::{io_error, io_error_at, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Outcome of [`write_new`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    /// The destination already existed and was left untouched
    AlreadyExists,
}

/// Create `target` with `content`, never replacing an existing file.
///
/// # Errors
///
/// Returns `Io` if the directory cannot be created or the content cannot be
/// written and synced.
pub fn write_new(target: &Path, content: &[u8]) -> Result<WriteOutcome> {
    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| io_error_at("create_dir", parent, e))?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| io_error("create_temp", e))?;
    temp.write_all(content)
        .map_err(|e| io_error("write_temp", e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| io_error("sync_temp", e))?;

    match temp.persist_noclobber(target) {
        Ok(_) => Ok(WriteOutcome::Created),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(WriteOutcome::AlreadyExists),
        Err(e) => Err(io_error_at("persist_temp", target, e.error)),
    }
}
