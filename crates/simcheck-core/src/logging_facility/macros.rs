//! Operation boundary macros.
//!
//! Every public operation that touches a file or a whole batch brackets its
//! work with a `start` event and either an `end` or an `end_error` event,
//! all carrying the same `op` name. Field keys follow
//! [`schema`](crate::logging_facility::schema).

/// Emit the `start` boundary of an operation.
///
/// ```
/// # use simcheck_core::log_op_start;
/// log_op_start!("load_rules");
/// log_op_start!("run_batch", sample_count = 120u64);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Emit the `end` boundary of an operation that succeeded.
///
/// ```
/// # use simcheck_core::log_op_end;
/// log_op_end!("load_rules", duration_ms = 3u64, rule_count = 12u64);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Emit the `end_error` boundary, tagged with the error's kind and stable
/// code.
///
/// `$err` is anything that converts into
/// [`ExError`](crate::errors::ExError).
///
/// ```
/// # use simcheck_core::{log_op_error, errors::SimCheckError};
/// let err = SimCheckError::ConfigParse {
///     line_no: 4,
///     line: "K, Hourly = high, 0.1".to_string(),
///     reason: "absolute threshold is not a number".to_string(),
/// };
/// log_op_error!("load_rules", err, duration_ms = 0u64, line_no = 4u64);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($field)*
        );
    }};
}
