//! Engine-level commands that require I/O (snapshot store, content archive).

use crate::commands::build::{record_build, BuildOutcome};
use crate::commands::changelog::{changelog, diff_snapshots};
use docdelta_core::classify::SeverityRules;
use docdelta_core::render::{ChangelogLog, RenderOptions, RenderedChangelog};
use docdelta_core::report::Summarizer;
use docdelta_core::snapshot::{ManifestEntry, TokenCounter};
use docdelta_core::{log_op_end, log_op_error, log_op_start};
use docdelta_store::errors::Result;
use docdelta_store::{FsContentArchive, SnapshotStore};
use std::collections::BTreeMap;
use std::time::Instant;

/// Injected collaborators and configuration shared by every command.
pub struct EngineContext<'a> {
    pub rules: &'a SeverityRules,
    /// Falls back to the chars/4 estimate when absent
    pub counter: Option<&'a dyn TokenCounter>,
    /// Only ever affects the free-text report summary
    pub summarizer: Option<&'a dyn Summarizer>,
    pub render_options: RenderOptions,
}

impl<'a> EngineContext<'a> {
    pub fn new(rules: &'a SeverityRules) -> Self {
        Self {
            rules,
            counter: None,
            summarizer: None,
            render_options: RenderOptions::default(),
        }
    }

    pub fn with_counter(mut self, counter: &'a dyn TokenCounter) -> Self {
        self.counter = Some(counter);
        self
    }

    pub fn with_summarizer(mut self, summarizer: &'a dyn Summarizer) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }
}

/// Engine-level commands that require I/O.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Snapshot a finished catalog build, archive its content, persist it and
    /// diff it against the previous build.
    RecordBuild {
        entries: Vec<ManifestEntry>,
        source_versions: BTreeMap<String, String>,
    },
    /// Diff two stored snapshots. `previous: None` yields a first-build diff.
    DiffSnapshots {
        previous: Option<String>,
        current: String,
    },
    /// Aggregate the reports of the `last_n` most recent builds.
    Changelog { last_n: usize },
}

impl EngineCommand {
    fn op_name(&self) -> &'static str {
        match self {
            EngineCommand::RecordBuild { .. } => "engine.record_build",
            EngineCommand::DiffSnapshots { .. } => "engine.diff_snapshots",
            EngineCommand::Changelog { .. } => "engine.changelog",
        }
    }
}

/// Result of applying an engine command.
#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    BuildRecorded(Box<BuildOutcome>),
    Diff(Box<RenderedChangelog>),
    Changelog { log: ChangelogLog, markdown: String },
}

/// Apply an engine command against a snapshot store and content archive.
///
/// # Errors
///
/// Propagates the error of the underlying operation; see [`record_build`],
/// [`diff_snapshots`] and [`changelog`].
pub fn apply_engine_command(
    cmd: EngineCommand,
    store: &dyn SnapshotStore,
    archive: &FsContentArchive,
    ctx: &EngineContext<'_>,
) -> Result<EngineCommandResult> {
    let op = cmd.op_name();
    let start = Instant::now();
    log_op_start!(op);

    let result = match cmd {
        EngineCommand::RecordBuild {
            entries,
            source_versions,
        } => record_build(&entries, source_versions, store, archive, ctx)
            .map(|outcome| EngineCommandResult::BuildRecorded(Box::new(outcome))),
        EngineCommand::DiffSnapshots { previous, current } => {
            diff_snapshots(previous.as_deref(), &current, store, archive, ctx)
                .map(|rendered| EngineCommandResult::Diff(Box::new(rendered)))
        }
        EngineCommand::Changelog { last_n } => changelog(last_n, store, archive, ctx)
            .map(|(log, markdown)| EngineCommandResult::Changelog { log, markdown }),
    };

    match &result {
        Ok(_) => {
            log_op_end!(op, duration_ms = start.elapsed().as_millis() as u64);
        }
        Err(e) => {
            log_op_error!(op, e, duration_ms = start.elapsed().as_millis() as u64);
        }
    }
    result
}
