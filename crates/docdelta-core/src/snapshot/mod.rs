//! Snapshot domain logic.
//!
//! A snapshot is the immutable metadata summary of one catalog build: for every
//! page path its content hash, token count, title and tags.
//!
//! ## Responsibilities
//!
//! - Define the snapshot record and its persisted JSON shape
//! - Normalize and hash page content deterministically
//! - Build snapshots from a finished content manifest
//!
//! ## Non-Responsibilities
//!
//! - Persistence (handled by `docdelta-store`)
//! - Orchestration (handled by `docdelta-engine`)

pub mod builder;
pub mod digest;
pub mod model;
pub mod tokens;

pub use builder::{build_snapshot, build_snapshot_at, snapshot_id_for, ManifestEntry};
pub use digest::{compute_content_hash, normalize_content};
pub use model::{PageMetadata, Snapshot};
pub use tokens::{EstimatingTokenCounter, TokenCounter};
