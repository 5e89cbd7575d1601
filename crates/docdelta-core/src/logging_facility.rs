//! Structured logging for docdelta operations
//!
//! Every operation is bracketed by `log_op_start!` and either `log_op_end!`
//! or `log_op_error!`; recoverable fallbacks use `log_op_degraded!`. Field
//! and event names live in [`schema`] so log consumers can rely on them.
//!
//! ```rust
//! use docdelta_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod schema;
pub mod test_capture;

pub use init::{init, init_with_filter, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
