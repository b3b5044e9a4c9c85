//! Canonical logging macros
//!
//! Field keys follow `peopledb_core_types::schema`.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use peopledb_core::log_op_start;
/// log_op_start!("save");
/// log_op_start!("save", entity_type = "Person");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::peopledb_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::peopledb_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use peopledb_core::log_op_end;
/// log_op_end!("count", duration_ms = 3);
/// log_op_end!("count", duration_ms = 3, rows = 1);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::peopledb_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::peopledb_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// `$err` must evaluate to a `&OrmError`.
///
/// # Example
///
/// ```
/// # use peopledb_core::{log_op_error, errors::OrmError};
/// let err = OrmError::ColumnNotFound { alias: "P_ID".to_string() };
/// log_op_error!("find_by_id", &err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let orm_err: &$crate::errors::OrmError = $err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::peopledb_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?orm_err.kind(),
            err.code = orm_err.code(),
            error = %orm_err,
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let orm_err: &$crate::errors::OrmError = $err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::peopledb_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?orm_err.kind(),
            err.code = orm_err.code(),
            error = %orm_err,
            $($field)*
        );
    }};
}
