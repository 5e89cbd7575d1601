//! Changelog rendering: fixed-shape Markdown and the machine-readable log.

pub mod changelog;
pub mod log;

pub use changelog::{
    render, render_changelog, render_with, tier_heading, RenderOptions, RenderedChangelog,
    EMPTY_SECTION_PLACEHOLDER,
};
pub use log::ChangelogLog;
