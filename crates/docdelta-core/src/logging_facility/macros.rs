//! Operation logging macros
//!
//! Each macro stamps the canonical `component`, `op` and `event` fields and
//! forwards any extra `tracing` fields unchanged.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:expr, $op:expr, $event:expr $(, $($rest:tt)*)?) => {
        tracing::event!(
            $level,
            component = module_path!(),
            op = $op,
            event = $event,
            $($($rest)*)?
        )
    };
}

/// `info!` marking the start of `op`
///
/// ```
/// # use docdelta_core::log_op_start;
/// log_op_start!("build_snapshot");
/// log_op_start!("build_snapshot", page_count = 12);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            tracing::Level::INFO,
            $op,
            $crate::logging_facility::schema::EVENT_START
            $(, $($field)*)?
        )
    };
}

/// `info!` marking successful completion; `duration_ms` is required
///
/// ```
/// # use docdelta_core::log_op_end;
/// log_op_end!("build_snapshot", duration_ms = 42);
/// log_op_end!("build_snapshot", duration_ms = 42, page_count = 12);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            tracing::Level::INFO,
            $op,
            $crate::logging_facility::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// `error!` marking failure, with the error's kind and stable code
///
/// ```
/// # use docdelta_core::log_op_error;
/// # use docdelta_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::SnapshotNotFound);
/// log_op_error!("load_snapshot", &err, duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: &$crate::errors::ExError = $err;
        $crate::__log_op_event!(
            tracing::Level::ERROR,
            $op,
            $crate::logging_facility::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code()
            $(, $($field)*)?
        )
    }};
}

/// `warn!` for an operation that continued with reduced output
///
/// Used when archived page content is missing: the diff loses its preview
/// but the operation still succeeds.
///
/// ```
/// # use docdelta_core::log_op_degraded;
/// # use docdelta_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::ArchivedContentUnavailable);
/// log_op_degraded!("compute_changes", &err, path = "guides/a.md");
/// ```
#[macro_export]
macro_rules! log_op_degraded {
    ($op:expr, $err:expr $(, $($field:tt)*)?) => {{
        let ex_err: &$crate::errors::ExError = $err;
        $crate::__log_op_event!(
            tracing::Level::WARN,
            $op,
            $crate::logging_facility::schema::EVENT_DEGRADED,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code()
            $(, $($field)*)?
        )
    }};
}
