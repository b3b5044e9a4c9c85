//! Store protocol
//!
//! The narrow capability set the engine needs from a relational store. A
//! store is a single logical connection; implementations make no
//! thread-safety promise and open no transactions of their own.

use crate::errors::{Result, StoreError};
use crate::row::Row;
use crate::value::SqlValue;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

pub trait Store {
    /// Execute an insert and return the identifier the store generated
    fn insert_returning_id(&self, sql: &str, params: &[SqlValue]) -> StoreResult<i64>;

    /// Execute a parameterized statement and return the affected row count
    fn execute(&self, sql: &str, params: &[SqlValue]) -> StoreResult<usize>;

    /// Execute a query and materialize every row
    ///
    /// A column value the store cannot decode is an extraction error naming
    /// its label; statement failures are store errors.
    fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>>;

    /// Execute complete statement text with no parameters
    fn execute_plain(&self, sql: &str) -> StoreResult<usize>;
}
