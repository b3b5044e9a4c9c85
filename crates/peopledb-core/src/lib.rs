//! PeopleDB Core - generic object-relational mapping kernel
//!
//! This crate provides:
//! - A driver-neutral store protocol with label-addressed result rows
//! - Identifier binding through a per-type attribute descriptor
//! - Per-operation SQL resolution with declarative overrides
//! - A generic CRUD engine driven by a per-type mapping contract
//! - The Person / Address domain model
//! - The error and logging facilities shared by every crate

pub mod crud;
pub mod entity;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod operation;
pub mod row;
pub mod store;
pub mod value;

#[doc(hidden)]
pub use peopledb_core_types;

// Re-export commonly used types
pub use crud::{CrudRepository, EntityMapping};
pub use entity::{Entity, EntityDescriptor, FieldMarker, IdentifierBinder};
pub use errors::{OrmError, OrmErrorKind, Result, StoreError};
pub use model::{Address, Person, Region};
pub use operation::{CrudOperation, SqlOverride, SqlOverrides};
pub use row::{ColumnLabels, Row};
pub use store::{Store, StoreResult};
pub use value::SqlValue;
