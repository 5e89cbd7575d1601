//! Command orchestration layer.
//!
//! Provides high-level command functions that coordinate between
//! core domain logic and persistence layer.

pub mod build;
pub mod changelog;
pub mod engine_command;

pub use engine_command::{apply_engine_command, EngineCommand, EngineCommandResult, EngineContext};
