//! Driver-neutral SQL values
//!
//! Repositories bind and extract through `SqlValue` so the engine depends only
//! on the store protocol. Timestamps travel as UTC RFC 3339 text and decimals
//! as their canonical text form, which keeps both lossless in any store.

use crate::errors::{OrmError, Result};
use chrono::{DateTime, Datelike, FixedOffset, SecondsFormat, Utc};
use rust_decimal::Decimal;
use std::fmt;

/// A single bound parameter or result column value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Integer(_) => "integer",
            SqlValue::Real(_) => "real",
            SqlValue::Text(_) => "text",
            SqlValue::Blob(_) => "blob",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Encode an instant as UTC RFC 3339 text
    ///
    /// Years outside 0000-9999 render with a sign and do not parse back;
    /// use `checked_timestamp` for values headed to the store.
    pub fn timestamp(value: &DateTime<FixedOffset>) -> Self {
        SqlValue::Text(
            value
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
        )
    }

    /// Encode an instant for binding, rejecting UTC years RFC 3339 cannot hold
    pub fn checked_timestamp(value: &DateTime<FixedOffset>) -> Result<Self> {
        let encoded = Self::timestamp(value);
        if (0..=9999).contains(&value.with_timezone(&Utc).year()) {
            Ok(encoded)
        } else {
            Err(OrmError::TimestampOutOfRange {
                value: encoded.to_string(),
            })
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("null"),
            SqlValue::Integer(v) => write!(f, "{}", v),
            SqlValue::Real(v) => write!(f, "{}", v),
            SqlValue::Text(v) => f.write_str(v),
            SqlValue::Blob(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<Decimal> for SqlValue {
    fn from(value: Decimal) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<&DateTime<FixedOffset>> for SqlValue {
    fn from(value: &DateTime<FixedOffset>) -> Self {
        SqlValue::timestamp(value)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}
