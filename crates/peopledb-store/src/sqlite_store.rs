//! rusqlite implementation of the store protocol

use crate::errors::{from_rusqlite, Result};
use peopledb_core::errors::OrmError;
use peopledb_core::row::{ColumnLabels, Row};
use peopledb_core::store::{Store, StoreResult};
use peopledb_core::value::SqlValue;
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection};
use std::sync::Arc;

/// Store over one borrowed SQLite connection
///
/// Works over a plain `Connection` or a `rusqlite::Transaction` (which
/// derefs to one), so callers choose the transaction boundary.
#[derive(Debug, Clone, Copy)]
pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &'c Connection {
        self.conn
    }
}

fn to_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(v) => Value::Integer(*v),
        SqlValue::Real(v) => Value::Real(*v),
        SqlValue::Text(v) => Value::Text(v.clone()),
        SqlValue::Blob(v) => Value::Blob(v.clone()),
    }
}

fn from_value_ref(label: &str, value: ValueRef<'_>) -> Result<SqlValue> {
    Ok(match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(v) => SqlValue::Integer(v),
        ValueRef::Real(v) => SqlValue::Real(v),
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes).map_err(|e| OrmError::InvalidValue {
                alias: label.to_string(),
                reason: format!("text is not valid UTF-8: {e}"),
            })?;
            SqlValue::Text(text.to_string())
        }
        ValueRef::Blob(bytes) => SqlValue::Blob(bytes.to_vec()),
    })
}

impl Store for SqliteStore<'_> {
    fn insert_returning_id(&self, sql: &str, params: &[SqlValue]) -> StoreResult<i64> {
        tracing::trace!(sql, params = params.len(), "insert");
        let mut stmt = self
            .conn
            .prepare_cached(sql)
            .map_err(|e| from_rusqlite("insert", e))?;
        stmt.insert(params_from_iter(params.iter().map(to_value)))
            .map_err(|e| from_rusqlite("insert", e))
    }

    fn execute(&self, sql: &str, params: &[SqlValue]) -> StoreResult<usize> {
        tracing::trace!(sql, params = params.len(), "execute");
        let mut stmt = self
            .conn
            .prepare_cached(sql)
            .map_err(|e| from_rusqlite("execute", e))?;
        stmt.execute(params_from_iter(params.iter().map(to_value)))
            .map_err(|e| from_rusqlite("execute", e))
    }

    fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>> {
        tracing::trace!(sql, params = params.len(), "query");
        let mut stmt = self
            .conn
            .prepare_cached(sql)
            .map_err(|e| from_rusqlite("query", e))?;

        let labels = Arc::new(ColumnLabels::new(
            stmt.column_names().into_iter().map(String::from).collect(),
        ));

        let mut rows = stmt
            .query(params_from_iter(params.iter().map(to_value)))
            .map_err(|e| from_rusqlite("query", e))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(|e| from_rusqlite("query", e))? {
            let values = labels
                .labels()
                .iter()
                .enumerate()
                .map(|(i, label)| {
                    let value = row.get_ref(i).map_err(|e| from_rusqlite("query", e))?;
                    from_value_ref(label, value)
                })
                .collect::<Result<Vec<_>>>()?;
            out.push(Row::new(Arc::clone(&labels), values));
        }
        Ok(out)
    }

    fn execute_plain(&self, sql: &str) -> StoreResult<usize> {
        tracing::trace!(sql, "execute_plain");
        self.conn
            .execute(sql, [])
            .map_err(|e| from_rusqlite("execute_plain", e))
    }
}
