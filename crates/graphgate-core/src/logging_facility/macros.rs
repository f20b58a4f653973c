//! Boundary logging macros
//!
//! Every mutation invocation emits exactly one start event and exactly one
//! of end / end_error.

/// Log the start of an operation
///
/// ```
/// # use graphgate_core::log_op_start;
/// log_op_start!("create_user");
/// log_op_start!("delete_user", user_id = "u1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = graphgate_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = graphgate_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use graphgate_core::log_op_end;
/// log_op_end!("create_user", duration_ms = 4);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = graphgate_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = graphgate_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log a failed operation with its classified error
///
/// ```
/// # use graphgate_core::log_op_error;
/// use graphgate_core::errors::{ClassifiedError, ErrorCode};
///
/// let err = ClassifiedError::new(ErrorCode::UserNotFound);
/// log_op_error!("delete_user", &err, duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let classified: &$crate::errors::ClassifiedError = $err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = graphgate_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.code = classified.code_str(),
            err.field = classified.field().unwrap_or_default(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let classified: &$crate::errors::ClassifiedError = $err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = graphgate_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.code = classified.code_str(),
            err.field = classified.field().unwrap_or_default(),
            $($field)*
        );
    }};
}
