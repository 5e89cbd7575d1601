//! DocDelta Core - change tracking for generated documentation catalogs
//!
//! This crate provides the pure domain logic for tracking what changed
//! between successive builds of a content catalog:
//! - Immutable snapshots of a build's page set (hash, token count, title, tags)
//! - A deterministic, path-ordered diff engine between two snapshots
//! - An injectable severity rule set and a pure four-tier classifier
//! - Report assembly and fixed-shape changelog rendering
//!
//! Persistence lives in `docdelta-store`; orchestration in `docdelta-engine`.

pub mod classify;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod render;
pub mod report;
pub mod snapshot;

// Re-export commonly used types
pub use classify::{classify, Severity, SeverityRules};
pub use diff::{compute_changes, ArchivedContent, ChangeSet, ChangeType, DiffStats, RawChange};
pub use errors::{ExError, ExErrorKind, Result, RulesError};
pub use render::{render, render_changelog, ChangelogLog, RenderOptions, RenderedChangelog};
pub use report::{ChangeEntry, DiffReport, ReportBuilder, Summarizer};
pub use snapshot::{build_snapshot, ManifestEntry, PageMetadata, Snapshot, TokenCounter};
