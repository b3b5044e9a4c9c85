//! Repositories over the SQLite store
//!
//! Each repository is the generic CRUD engine bound to one entity mapping.

pub mod address_repo;
pub mod hydration;
pub mod people_repo;

pub use address_repo::{AddressMapping, AddressRepository};
pub use hydration::AliasExtractor;
pub use people_repo::{PeopleRepository, PersonMapping};
