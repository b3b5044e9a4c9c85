//! Error handling for peopledb-store
//!
//! Converts rusqlite failures into the store protocol's error type

use peopledb_core::errors::{OrmError, StoreError};

/// Result type alias using OrmError
pub type Result<T> = std::result::Result<T, OrmError>;

/// Create a store error from rusqlite::Error
pub fn from_rusqlite(op: &str, err: rusqlite::Error) -> StoreError {
    StoreError::new(err.to_string()).with_op(op)
}

/// Same as `from_rusqlite`, lifted into `OrmError` for `?` in setup code
pub fn orm_from_rusqlite(op: &str, err: rusqlite::Error) -> OrmError {
    OrmError::Store(from_rusqlite(op, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use peopledb_core::errors::OrmErrorKind;

    #[test]
    fn test_driver_message_is_kept() {
        let err = from_rusqlite("query", rusqlite::Error::InvalidQuery);
        assert_eq!(err.op(), "query");
        assert!(!err.message().is_empty());
        assert_eq!(
            orm_from_rusqlite("query", rusqlite::Error::InvalidQuery).kind(),
            OrmErrorKind::Store
        );
    }
}
