//! Content archive
//!
//! Provides:
//! - Filesystem archive of raw page text keyed by content hash
//! - First-writer-wins atomic file creation
//! - Sharding by first 2 hex chars of the hash

pub(crate) mod atomic;
mod fs_archive;
mod sharding;

pub use fs_archive::FsContentArchive;
