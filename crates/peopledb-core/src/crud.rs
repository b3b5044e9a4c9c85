//! Generic CRUD engine
//!
//! `CrudRepository` runs save/find/count/update/delete for one entity type.
//! The per-type `EntityMapping` supplies parameter binding, row extraction
//! and optional statement overrides; the engine owns statement resolution,
//! identifier write-back and error wrapping.

use crate::entity::{Entity, IdentifierBinder};
use crate::errors::{OrmError, Result};
use crate::operation::{CrudOperation, OperationResolver, ResolvedSql, SqlOverrides};
use crate::row::Row;
use crate::store::Store;
use crate::value::SqlValue;
use crate::{log_op_end, log_op_error, log_op_start};
use std::time::Instant;

/// Placeholder substituted with the comma-joined identifiers in DELETE_MANY
pub const IDS_PLACEHOLDER: &str = ":ids";

/// Per-type contract between an entity and the engine
pub trait EntityMapping: Sized {
    type Entity: Entity;

    /// Declared statement overrides, validated at construction
    fn sql_overrides(&self) -> Option<&SqlOverrides> {
        None
    }

    /// Built-in statement for an operation
    fn default_sql(&self, _operation: CrudOperation) -> Option<&'static str> {
        None
    }

    /// Positional parameters for the SAVE statement
    ///
    /// May persist owned sub-entities through `store` first and write their
    /// identifiers back into `entity`.
    fn map_for_save(&self, store: &dyn Store, entity: &mut Self::Entity)
        -> Result<Vec<SqlValue>>;

    /// Positional parameters for the UPDATE statement, excluding the id
    fn map_for_update(&self, entity: &Self::Entity) -> Result<Vec<SqlValue>>;

    fn extract_entity(&self, row: &Row) -> Result<Self::Entity>;

    /// Runs after the entity's row exists and its id is assigned
    fn post_save(
        &self,
        _repo: &CrudRepository<'_, Self>,
        _entity: &mut Self::Entity,
    ) -> Result<()> {
        Ok(())
    }

    /// Runs on the entity returned by `find_by_id`
    fn post_find(
        &self,
        _repo: &CrudRepository<'_, Self>,
        _entity: &mut Self::Entity,
    ) -> Result<()> {
        Ok(())
    }
}

/// Repository for one entity type over a borrowed store
pub struct CrudRepository<'s, M: EntityMapping> {
    store: &'s dyn Store,
    mapping: M,
    binder: IdentifierBinder<M::Entity>,
}

impl<'s, M: EntityMapping> CrudRepository<'s, M> {
    /// Register a repository; fails if the entity has no usable identifier
    pub fn new(store: &'s dyn Store, mapping: M) -> Result<Self> {
        Ok(Self {
            store,
            mapping,
            binder: IdentifierBinder::for_entity()?,
        })
    }

    pub fn store(&self) -> &'s dyn Store {
        self.store
    }

    pub fn mapping(&self) -> &M {
        &self.mapping
    }

    pub fn binder(&self) -> &IdentifierBinder<M::Entity> {
        &self.binder
    }

    fn entity_type(&self) -> &'static str {
        self.binder.entity_type()
    }

    fn resolve(&self, operation: CrudOperation) -> Result<ResolvedSql> {
        let resolved = OperationResolver::new(self.mapping.sql_overrides()).resolve(
            operation,
            || {
                self.mapping
                    .default_sql(operation)
                    .map(str::to_string)
                    .ok_or(OrmError::SqlNotDefined { operation })
            },
        )?;
        tracing::debug!(
            entity_type = self.entity_type(),
            operation = operation.as_str(),
            sql_source = resolved.source,
            sql = %resolved.sql,
            "resolved statement"
        );
        Ok(resolved)
    }

    /// Persist a new entity and return it with its identifier assigned
    pub fn save(&self, mut entity: M::Entity) -> Result<M::Entity> {
        self.save_in_place(&mut entity)?;
        Ok(entity)
    }

    /// Persist a new entity, writing the generated identifier into it
    ///
    /// Any failure, including one raised by a cascaded save, is reported as
    /// a single persistence error naming the attempted entity.
    pub fn save_in_place(&self, entity: &mut M::Entity) -> Result<()> {
        log_op_start!("save", entity_type = self.entity_type());
        let start = Instant::now();

        match self.save_impl(entity) {
            Ok(id) => {
                log_op_end!(
                    "save",
                    duration_ms = start.elapsed().as_millis() as u64,
                    entity_type = self.entity_type(),
                    entity_id = id
                );
                Ok(())
            }
            Err(source) => {
                let err = OrmError::persistence(self.binder.describe(entity), source);
                log_op_error!(
                    "save",
                    &err,
                    duration_ms = start.elapsed().as_millis() as u64,
                    entity_type = self.entity_type()
                );
                Err(err)
            }
        }
    }

    fn save_impl(&self, entity: &mut M::Entity) -> Result<i64> {
        let resolved = self.resolve(CrudOperation::Save)?;
        if let Some(id) = self.binder.current_id(entity)? {
            return Err(OrmError::AlreadyPersisted {
                entity_type: self.entity_type(),
                id,
            });
        }

        let params = self.mapping.map_for_save(self.store, entity)?;
        let id = self.store.insert_returning_id(&resolved.sql, &params)?;
        self.binder.set_id(entity, id)?;
        self.mapping.post_save(self, entity)?;
        Ok(id)
    }

    /// Look up one entity by identifier
    pub fn find_by_id(&self, id: i64) -> Result<Option<M::Entity>> {
        log_op_start!("find_by_id", entity_type = self.entity_type(), entity_id = id);
        let start = Instant::now();

        let result = self.find_by_id_impl(id).map_err(|e| {
            log_op_error!(
                "find_by_id",
                &e,
                duration_ms = start.elapsed().as_millis() as u64,
                entity_type = self.entity_type()
            );
            e
        })?;

        log_op_end!(
            "find_by_id",
            duration_ms = start.elapsed().as_millis() as u64,
            entity_type = self.entity_type(),
            rows = u64::from(result.is_some())
        );
        Ok(result)
    }

    fn find_by_id_impl(&self, id: i64) -> Result<Option<M::Entity>> {
        let resolved = self.resolve(CrudOperation::FindById)?;
        let rows = self.store.query(&resolved.sql, &[SqlValue::Integer(id)])?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };

        let mut entity = self.mapping.extract_entity(row)?;
        self.mapping.post_find(self, &mut entity)?;
        Ok(Some(entity))
    }

    /// Every entity returned by the FIND_ALL statement, in result order
    pub fn find_all(&self) -> Result<Vec<M::Entity>> {
        log_op_start!("find_all", entity_type = self.entity_type());
        let start = Instant::now();

        let result = self
            .resolve(CrudOperation::FindAll)
            .and_then(|resolved| self.query_entities(&resolved.sql, &[]))
            .map_err(|e| {
                log_op_error!(
                    "find_all",
                    &e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    entity_type = self.entity_type()
                );
                e
            })?;

        log_op_end!(
            "find_all",
            duration_ms = start.elapsed().as_millis() as u64,
            entity_type = self.entity_type(),
            rows = result.len() as u64
        );
        Ok(result)
    }

    /// Run `sql` and extract every returned row, without the `post_find` hook
    pub fn query_entities(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<M::Entity>> {
        self.store
            .query(sql, params)?
            .iter()
            .map(|row| self.mapping.extract_entity(row))
            .collect()
    }

    /// Number of stored entities; 0 when the statement returns no row
    pub fn count(&self) -> Result<i64> {
        log_op_start!("count", entity_type = self.entity_type());
        let start = Instant::now();

        let result = self.count_impl().map_err(|e| {
            log_op_error!(
                "count",
                &e,
                duration_ms = start.elapsed().as_millis() as u64,
                entity_type = self.entity_type()
            );
            e
        })?;

        log_op_end!(
            "count",
            duration_ms = start.elapsed().as_millis() as u64,
            entity_type = self.entity_type()
        );
        Ok(result)
    }

    fn count_impl(&self) -> Result<i64> {
        let resolved = self.resolve(CrudOperation::Count)?;
        let rows = self.store.query(&resolved.sql, &[])?;
        match rows.first().and_then(|row| row.value_at(0)) {
            None | Some(SqlValue::Null) => Ok(0),
            Some(SqlValue::Integer(n)) => Ok(*n),
            Some(other) => Err(OrmError::InvalidValue {
                alias: "COUNT(*)".to_string(),
                reason: format!("expected integer count, got {}", other.type_name()),
            }),
        }
    }

    /// Delete one persisted entity; returns the affected row count
    pub fn delete(&self, entity: &M::Entity) -> Result<usize> {
        log_op_start!("delete", entity_type = self.entity_type());
        let start = Instant::now();

        let result = self.delete_impl(entity).map_err(|e| {
            log_op_error!(
                "delete",
                &e,
                duration_ms = start.elapsed().as_millis() as u64,
                entity_type = self.entity_type()
            );
            e
        })?;

        log_op_end!(
            "delete",
            duration_ms = start.elapsed().as_millis() as u64,
            entity_type = self.entity_type(),
            rows = result as u64
        );
        Ok(result)
    }

    fn delete_impl(&self, entity: &M::Entity) -> Result<usize> {
        let resolved = self.resolve(CrudOperation::DeleteOne)?;
        let id = self.binder.get_id(entity)?;
        Ok(self.store.execute(&resolved.sql, &[SqlValue::Integer(id)])?)
    }

    /// Delete several persisted entities in one statement
    ///
    /// An empty slice issues no statement and returns 0.
    pub fn delete_many(&self, entities: &[M::Entity]) -> Result<usize> {
        log_op_start!(
            "delete_many",
            entity_type = self.entity_type(),
            requested = entities.len() as u64
        );
        let start = Instant::now();

        let result = self.delete_many_impl(entities).map_err(|e| {
            log_op_error!(
                "delete_many",
                &e,
                duration_ms = start.elapsed().as_millis() as u64,
                entity_type = self.entity_type()
            );
            e
        })?;

        log_op_end!(
            "delete_many",
            duration_ms = start.elapsed().as_millis() as u64,
            entity_type = self.entity_type(),
            rows = result as u64
        );
        Ok(result)
    }

    fn delete_many_impl(&self, entities: &[M::Entity]) -> Result<usize> {
        let resolved = self.resolve(CrudOperation::DeleteMany)?;
        if !resolved.sql.contains(IDS_PLACEHOLDER) {
            return Err(OrmError::MissingPlaceholder {
                operation: CrudOperation::DeleteMany,
                placeholder: IDS_PLACEHOLDER,
            });
        }
        if entities.is_empty() {
            return Ok(0);
        }

        let ids = entities
            .iter()
            .map(|entity| self.binder.get_id(entity).map(|id| id.to_string()))
            .collect::<Result<Vec<_>>>()?;
        let sql = resolved.sql.replace(IDS_PLACEHOLDER, &ids.join(","));
        Ok(self.store.execute_plain(&sql)?)
    }

    /// Write the entity's mapped columns back to its row
    ///
    /// A nonexistent id affects zero rows and is not an error.
    pub fn update(&self, entity: &M::Entity) -> Result<usize> {
        log_op_start!("update", entity_type = self.entity_type());
        let start = Instant::now();

        let result = self.update_impl(entity).map_err(|e| {
            log_op_error!(
                "update",
                &e,
                duration_ms = start.elapsed().as_millis() as u64,
                entity_type = self.entity_type()
            );
            e
        })?;

        log_op_end!(
            "update",
            duration_ms = start.elapsed().as_millis() as u64,
            entity_type = self.entity_type(),
            rows = result as u64
        );
        Ok(result)
    }

    fn update_impl(&self, entity: &M::Entity) -> Result<usize> {
        let resolved = self.resolve(CrudOperation::Update)?;
        let mut params = self.mapping.map_for_update(entity)?;
        params.push(SqlValue::Integer(self.binder.get_id(entity)?));
        Ok(self.store.execute(&resolved.sql, &params)?)
    }
}

impl<M: EntityMapping + std::fmt::Debug> std::fmt::Debug for CrudRepository<'_, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudRepository")
            .field("mapping", &self.mapping)
            .field("binder", &self.binder)
            .finish()
    }
}
