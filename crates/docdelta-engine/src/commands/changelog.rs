//! Diff and changelog queries over stored snapshots.

use crate::commands::engine_command::EngineContext;
use docdelta_core::render::{render_with, ChangelogLog, RenderedChangelog};
use docdelta_core::report::{DiffReport, ReportBuilder};
use docdelta_core::snapshot::Snapshot;
use docdelta_store::errors::Result;
use docdelta_store::{FsContentArchive, SnapshotStore};

fn report_between(
    previous: Option<&Snapshot>,
    current: &Snapshot,
    archive: &FsContentArchive,
    ctx: &EngineContext<'_>,
) -> Result<DiffReport> {
    let mut builder = ReportBuilder::new(ctx.rules)
        .archive(archive)
        .generated_at(current.generated_at())
        .preview_chars(ctx.render_options.preview_chars);
    if let Some(summarizer) = ctx.summarizer {
        builder = builder.summarizer(summarizer);
    }
    builder.build(previous, current)
}

/// Diff two stored snapshots; `previous = None` treats `current` as a first build.
///
/// # Errors
///
/// `SnapshotNotFound` if either id is unknown, `MalformedSnapshot` if a stored
/// record does not parse.
pub fn diff_snapshots(
    previous_id: Option<&str>,
    current_id: &str,
    store: &dyn SnapshotStore,
    archive: &FsContentArchive,
    ctx: &EngineContext<'_>,
) -> Result<RenderedChangelog> {
    let current = store.load(current_id)?;
    let previous = previous_id.map(|id| store.load(id)).transpose()?;
    let report = report_between(previous.as_ref(), &current, archive, ctx)?;
    Ok(render_with(&report, &ctx.render_options))
}

/// Aggregated changelog over the `last_n` most recent builds, newest first.
///
/// Each of the latest `last_n` snapshots is diffed against the one stored
/// before it; the oldest stored snapshot is diffed against nothing.
///
/// # Errors
///
/// `MalformedSnapshot` if any stored record does not parse.
pub fn changelog(
    last_n: usize,
    store: &dyn SnapshotStore,
    archive: &FsContentArchive,
    ctx: &EngineContext<'_>,
) -> Result<(ChangelogLog, String)> {
    let snapshots = store.load_latest(last_n.saturating_add(1))?;

    let mut log = ChangelogLog::new();
    for (i, current) in snapshots.iter().take(last_n).enumerate() {
        let report = report_between(snapshots.get(i + 1), current, archive, ctx)?;
        log.reports.push(report);
    }

    let markdown = log.render_markdown(&ctx.render_options);
    Ok((log, markdown))
}
