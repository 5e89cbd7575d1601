//! DocDelta Engine - Orchestration layer
//!
//! Provides high-level command orchestration that coordinates between
//! core change-tracking logic and the persistence layer.

pub mod commands;
