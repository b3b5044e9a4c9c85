//! PeopleDB Store - SQLite persistence for the ORM kernel
//!
//! Provides:
//! - `SqliteStore`, the rusqlite implementation of the store protocol
//! - Connection utilities and the canonical schema bootstrap
//! - The Address and People repositories, including cascading saves and
//!   alias-based extraction of joined rows

pub mod db;
pub mod errors;
pub mod repo;
pub mod schema;
pub mod sqlite_store;

// Re-export key types
pub use errors::Result;
pub use repo::{AddressRepository, PeopleRepository};
pub use sqlite_store::SqliteStore;
