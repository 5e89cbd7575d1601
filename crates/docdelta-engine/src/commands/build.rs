//! Record-build orchestration.
//!
//! ## Pipeline (in order):
//! 1. Load the latest stored snapshot (absent on a first build)
//! 2. Build the new snapshot from the manifest (DuplicatePath aborts, no writes)
//! 3. Archive raw page content under each page's content hash
//! 4. Save the snapshot (ImmutabilityViolation surfaces from the store)
//! 5. Diff against the previous snapshot, classify and render

use crate::commands::engine_command::EngineContext;
use docdelta_core::render::{render_with, RenderedChangelog};
use docdelta_core::report::ReportBuilder;
use docdelta_core::snapshot::{build_snapshot, ManifestEntry, Snapshot};
use docdelta_store::errors::Result;
use docdelta_store::{FsContentArchive, SnapshotStore};
use serde::Serialize;
use std::collections::BTreeMap;

/// Result of recording one catalog build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildOutcome {
    pub snapshot: Snapshot,
    /// None on the first build
    pub previous_snapshot_id: Option<String>,
    /// Pages whose raw content was newly archived by this build
    pub archived_pages: usize,
    pub changelog: RenderedChangelog,
}

/// Snapshot, archive, persist and diff one finished catalog build.
///
/// # Errors
///
/// - `DuplicatePath`: two manifest entries share a path (nothing written)
/// - `ImmutabilityViolation`: a snapshot with the fresh id already exists
/// - `MalformedSnapshot`: the previous stored snapshot does not parse
/// - `Io`: archive or store writes failed
pub fn record_build(
    entries: &[ManifestEntry],
    source_versions: BTreeMap<String, String>,
    store: &dyn SnapshotStore,
    archive: &FsContentArchive,
    ctx: &EngineContext<'_>,
) -> Result<BuildOutcome> {
    let previous = store.load_latest(1)?.into_iter().next();

    let snapshot = build_snapshot(entries, source_versions, ctx.counter)?;

    let mut archived_pages = 0;
    for entry in entries {
        if let Some(page) = snapshot.page(&entry.path) {
            if archive.put(&page.content_hash, &entry.content)? {
                archived_pages += 1;
            }
        }
    }

    store.save(&snapshot)?;

    let mut builder = ReportBuilder::new(ctx.rules)
        .archive(archive)
        .generated_at(snapshot.generated_at())
        .preview_chars(ctx.render_options.preview_chars);
    if let Some(summarizer) = ctx.summarizer {
        builder = builder.summarizer(summarizer);
    }
    let report = builder.build(previous.as_ref(), &snapshot)?;

    tracing::info!(
        snapshot_id = %snapshot.id(),
        previous_snapshot_id = ?previous.as_ref().map(|s| s.id()),
        archived_pages,
        total_changes = report.total_changes(),
        breaking = report.breaking_changes.len(),
        "recorded catalog build"
    );

    Ok(BuildOutcome {
        previous_snapshot_id: previous.map(|s| s.id().to_string()),
        archived_pages,
        changelog: render_with(&report, &ctx.render_options),
        snapshot,
    })
}
