//! DocDelta Store - Filesystem persistence for snapshots and page content
//!
//! Provides:
//! - Append-only snapshot store with first-writer-wins saves
//! - Content archive of raw page text for diff previews
//! - All-or-nothing file creation that never leaves partial records

pub mod cas;
pub mod errors;
pub mod snapshot;

// Re-export key types
pub use cas::FsContentArchive;
pub use errors::Result;
pub use snapshot::{FsSnapshotStore, SnapshotStore};
