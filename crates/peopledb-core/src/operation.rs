//! Operation kinds and per-operation SQL resolution
//!
//! A repository may declare statement overrides, grouped by the mapping
//! point they are attached to. The table is validated once when it is built;
//! resolution itself is a plain lookup performed on every call, falling back
//! to the type's built-in statement.

use crate::errors::{OrmError, Result};
use peopledb_core_types::schema::{SQL_SOURCE_DEFAULT, SQL_SOURCE_OVERRIDE};
use std::collections::HashMap;
use std::fmt;

/// Logical CRUD operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrudOperation {
    Save,
    FindById,
    FindAll,
    Count,
    Update,
    DeleteOne,
    DeleteMany,
}

impl CrudOperation {
    pub const ALL: [CrudOperation; 7] = [
        CrudOperation::Save,
        CrudOperation::FindById,
        CrudOperation::FindAll,
        CrudOperation::Count,
        CrudOperation::Update,
        CrudOperation::DeleteOne,
        CrudOperation::DeleteMany,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CrudOperation::Save => "SAVE",
            CrudOperation::FindById => "FIND_BY_ID",
            CrudOperation::FindAll => "FIND_ALL",
            CrudOperation::Count => "COUNT",
            CrudOperation::Update => "UPDATE",
            CrudOperation::DeleteOne => "DELETE_ONE",
            CrudOperation::DeleteMany => "DELETE_MANY",
        }
    }
}

impl fmt::Display for CrudOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single declared override: one operation kind paired with literal SQL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlOverride {
    pub operation: CrudOperation,
    pub sql: &'static str,
}

impl SqlOverride {
    pub const fn new(operation: CrudOperation, sql: &'static str) -> Self {
        Self { operation, sql }
    }
}

#[derive(Debug, Clone)]
struct DeclaredSql {
    sql: &'static str,
    point: &'static str,
}

/// Validated operation → statement table for one repository type
#[derive(Debug, Clone, Default)]
pub struct SqlOverrides {
    entries: HashMap<CrudOperation, DeclaredSql>,
}

impl SqlOverrides {
    pub fn builder() -> SqlOverridesBuilder {
        SqlOverridesBuilder::default()
    }

    /// Declared statement for an operation, if any
    pub fn get(&self, operation: CrudOperation) -> Option<&'static str> {
        self.entries.get(&operation).map(|declared| declared.sql)
    }

    /// Name of the mapping point the operation's override is attached to
    pub fn attachment_point(&self, operation: CrudOperation) -> Option<&'static str> {
        self.entries.get(&operation).map(|declared| declared.point)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects overrides per attachment point, then validates them
#[derive(Debug, Default)]
pub struct SqlOverridesBuilder {
    declared: Vec<(&'static str, SqlOverride)>,
}

impl SqlOverridesBuilder {
    /// Attach one or more overrides to a named mapping point
    pub fn attach<I>(mut self, point: &'static str, overrides: I) -> Self
    where
        I: IntoIterator<Item = SqlOverride>,
    {
        self.declared
            .extend(overrides.into_iter().map(|entry| (point, entry)));
        self
    }

    /// Build the table, rejecting a second override for any operation
    pub fn build(self) -> Result<SqlOverrides> {
        let mut entries: HashMap<CrudOperation, DeclaredSql> = HashMap::new();
        for (point, entry) in self.declared {
            if let Some(existing) = entries.get(&entry.operation) {
                return Err(OrmError::DuplicateOverride {
                    operation: entry.operation,
                    first: existing.point,
                    second: point,
                });
            }
            entries.insert(
                entry.operation,
                DeclaredSql {
                    sql: entry.sql,
                    point,
                },
            );
        }
        Ok(SqlOverrides { entries })
    }
}

/// Statement text chosen for an operation, with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSql {
    pub sql: String,
    pub source: &'static str,
}

/// Picks the SQL text for an operation
#[derive(Debug, Clone, Copy)]
pub struct OperationResolver<'a> {
    overrides: Option<&'a SqlOverrides>,
}

impl<'a> OperationResolver<'a> {
    pub fn new(overrides: Option<&'a SqlOverrides>) -> Self {
        Self { overrides }
    }

    /// Resolve the statement for `operation`
    ///
    /// A declared override wins; otherwise `default_sql` supplies the
    /// built-in statement or fails with a resolution error.
    pub fn resolve<F>(&self, operation: CrudOperation, default_sql: F) -> Result<ResolvedSql>
    where
        F: FnOnce() -> Result<String>,
    {
        if let Some(sql) = self.overrides.and_then(|o| o.get(operation)) {
            return Ok(ResolvedSql {
                sql: sql.to_string(),
                source: SQL_SOURCE_OVERRIDE,
            });
        }
        Ok(ResolvedSql {
            sql: default_sql()?,
            source: SQL_SOURCE_DEFAULT,
        })
    }
}
