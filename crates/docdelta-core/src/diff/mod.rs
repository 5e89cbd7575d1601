//! Snapshot diff engine.
//!
//! Compares two snapshots path by path and produces raw, unclassified change
//! records together with aggregate statistics.
//!
//! ## Entry point
//!
//! ```ignore
//! use docdelta_core::diff::compute_changes;
//!
//! let change_set = compute_changes(Some(&previous), &current, Some(&archive))?;
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce byte-identical change lists and stats.
//! - **Path order**: changes are sorted by path.
//! - **Graceful previews**: a missing archived page only drops the preview; it
//!   never changes stats or which paths are reported.

pub mod archive;
pub mod engine;
pub mod model;
pub mod preview;

pub use archive::ArchivedContent;
pub use engine::compute_changes;
pub use model::{ChangeSet, ChangeType, DiffStats, RawChange};
