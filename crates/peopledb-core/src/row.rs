//! Result rows addressed by column label
//!
//! Joined and self-joined queries repeat the same physical columns under
//! different aliases, so extraction looks values up by label. The label map
//! is built once per executed query and shared by all of its rows.

use crate::errors::{OrmError, Result};
use crate::value::SqlValue;
use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

/// Column labels of one result set
#[derive(Debug, Clone, Default)]
pub struct ColumnLabels {
    labels: Vec<String>,
    /// Label -> index; the first column carrying a label wins
    index: HashMap<String, usize>,
}

impl ColumnLabels {
    pub fn new(labels: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            index.entry(label.clone()).or_insert(i);
        }
        Self { labels, index }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// One materialized result row
#[derive(Debug, Clone)]
pub struct Row {
    labels: Arc<ColumnLabels>,
    values: Vec<SqlValue>,
}

impl Row {
    pub fn new(labels: Arc<ColumnLabels>, values: Vec<SqlValue>) -> Self {
        Self { labels, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn labels(&self) -> &ColumnLabels {
        &self.labels
    }

    /// Value by position
    pub fn value_at(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    /// Value by column label
    pub fn value_by_label(&self, alias: &str) -> Result<&SqlValue> {
        self.labels
            .index_of(alias)
            .and_then(|i| self.values.get(i))
            .ok_or_else(|| OrmError::ColumnNotFound {
                alias: alias.to_string(),
            })
    }

    pub fn opt_i64(&self, alias: &str) -> Result<Option<i64>> {
        match self.value_by_label(alias)? {
            SqlValue::Null => Ok(None),
            SqlValue::Integer(v) => Ok(Some(*v)),
            SqlValue::Text(text) => text
                .parse::<i64>()
                .map(Some)
                .map_err(|e| invalid(alias, e.to_string())),
            other => Err(invalid(alias, format!("expected integer, got {}", other.type_name()))),
        }
    }

    pub fn i64(&self, alias: &str) -> Result<i64> {
        self.opt_i64(alias)?.ok_or_else(|| null(alias))
    }

    pub fn opt_string(&self, alias: &str) -> Result<Option<String>> {
        match self.value_by_label(alias)? {
            SqlValue::Null => Ok(None),
            SqlValue::Text(text) => Ok(Some(text.clone())),
            SqlValue::Integer(v) => Ok(Some(v.to_string())),
            SqlValue::Real(v) => Ok(Some(v.to_string())),
            SqlValue::Blob(_) => Err(invalid(alias, "expected text, got blob")),
        }
    }

    pub fn string(&self, alias: &str) -> Result<String> {
        self.opt_string(alias)?.ok_or_else(|| null(alias))
    }

    pub fn opt_decimal(&self, alias: &str) -> Result<Option<Decimal>> {
        match self.value_by_label(alias)? {
            SqlValue::Null => Ok(None),
            SqlValue::Text(text) => Decimal::from_str(text)
                .map(Some)
                .map_err(|e| invalid(alias, e.to_string())),
            SqlValue::Integer(v) => Ok(Some(Decimal::from(*v))),
            SqlValue::Real(v) => Decimal::try_from(*v)
                .map(Some)
                .map_err(|e| invalid(alias, e.to_string())),
            SqlValue::Blob(_) => Err(invalid(alias, "expected decimal, got blob")),
        }
    }

    /// Timestamp stored as RFC 3339 text, normalized to UTC
    pub fn timestamp(&self, alias: &str) -> Result<DateTime<FixedOffset>> {
        let text = self.string(alias)?;
        DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc).fixed_offset())
            .map_err(|e| invalid(alias, e.to_string()))
    }
}

fn invalid(alias: &str, reason: impl Into<String>) -> OrmError {
    OrmError::InvalidValue {
        alias: alias.to_string(),
        reason: reason.into(),
    }
}

fn null(alias: &str) -> OrmError {
    OrmError::UnexpectedNull {
        alias: alias.to_string(),
    }
}
