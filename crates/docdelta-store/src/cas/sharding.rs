//! Sharding logic for the content archive
//!
//! Shards blobs into subdirectories based on the first 2 hex characters
//! of the content hash so no single directory grows with the catalog.

use std::path::{Path, PathBuf};

/// Compute the shard path for a given content hash
///
/// For hash "abc123...", returns "<root>/ab/abc123.<ext>"
pub fn shard_path(root: &Path, content_hash: &str, extension: &str) -> PathBuf {
    let shard = content_hash.get(..2).unwrap_or(content_hash);
    root.join(shard)
        .join(format!("{}.{}", content_hash, extension))
}

/// Whether `content_hash` can safely name an archive file
pub fn is_hex_digest(content_hash: &str) -> bool {
    content_hash.len() >= 2 && content_hash.chars().all(|c| c.is_ascii_hexdigit())
}
