//! Classified diff reports.
//!
//! A [`DiffReport`] is the immutable, severity-bucketed result of diffing two
//! snapshots. [`ReportBuilder`] runs the diff engine and the classifier and
//! assembles the report; the optional [`Summarizer`] capability only ever
//! touches the free-text `summary`.

pub mod builder;
pub mod model;
pub mod summary;

pub use builder::ReportBuilder;
pub use model::{ChangeEntry, DiffReport};
pub use summary::{count_summary, section_for_path, Summarizer};
