//! Snapshot persistence layer.
//!
//! ## Responsibilities
//!
//! - Persist snapshot records append-only (first writer wins)
//! - Exact lookup and "latest N" queries
//! - Surface corrupt records instead of skipping them
//!
//! ## Non-Responsibilities
//!
//! - Snapshot construction and diffing (handled by `docdelta-core`)
//! - Orchestration (handled by `docdelta-engine`)

pub mod store;

pub use store::{validate_snapshot_id, FsSnapshotStore, SnapshotStore};
