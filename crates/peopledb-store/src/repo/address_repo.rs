//! Address repository
//!
//! Addresses use the engine's built-in statements, no overrides.

use crate::errors::Result;
use crate::repo::hydration::extract_address;
use peopledb_core::crud::{CrudRepository, EntityMapping};
use peopledb_core::entity::IdentifierBinder;
use peopledb_core::errors::OrmError;
use peopledb_core::model::Address;
use peopledb_core::operation::CrudOperation;
use peopledb_core::row::Row;
use peopledb_core::store::Store;
use peopledb_core::value::SqlValue;
use std::ops::Deref;

pub const SAVE_ADDRESS_SQL: &str = "INSERT INTO ADDRESSES \
    (STREET_ADDRESS, ADDRESS2, CITY, STATE, POSTCODE, COUNTY, REGION, COUNTRY) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)";
pub const FIND_ADDRESS_BY_ID_SQL: &str = "SELECT \
    ID, STREET_ADDRESS, ADDRESS2, CITY, STATE, POSTCODE, COUNTY, REGION, COUNTRY \
    FROM ADDRESSES WHERE ID = ?";
pub const FIND_ALL_ADDRESSES_SQL: &str = "SELECT \
    ID, STREET_ADDRESS, ADDRESS2, CITY, STATE, POSTCODE, COUNTY, REGION, COUNTRY \
    FROM ADDRESSES ORDER BY ID";
pub const COUNT_ADDRESSES_SQL: &str = "SELECT COUNT(*) FROM ADDRESSES";
pub const DELETE_ADDRESS_SQL: &str = "DELETE FROM ADDRESSES WHERE ID = ?";
pub const DELETE_ADDRESSES_IN_SQL: &str = "DELETE FROM ADDRESSES WHERE ID IN (:ids)";
pub const UPDATE_ADDRESS_SQL: &str = "UPDATE ADDRESSES SET \
    STREET_ADDRESS = ?, ADDRESS2 = ?, CITY = ?, STATE = ?, POSTCODE = ?, COUNTY = ?, \
    REGION = ?, COUNTRY = ? WHERE ID = ?";

#[derive(Debug)]
pub struct AddressMapping {
    binder: IdentifierBinder<Address>,
}

impl AddressMapping {
    pub fn new() -> Result<Self> {
        Ok(Self {
            binder: IdentifierBinder::for_entity()?,
        })
    }

    fn columns(address: &Address) -> Vec<SqlValue> {
        vec![
            address.street_address.as_str().into(),
            address.address2.clone().into(),
            address.city.as_str().into(),
            address.state.as_str().into(),
            address.postcode.as_str().into(),
            address.county.clone().into(),
            address.region.as_str().into(),
            address.country.as_str().into(),
        ]
    }
}

impl EntityMapping for AddressMapping {
    type Entity = Address;

    fn default_sql(&self, operation: CrudOperation) -> Option<&'static str> {
        Some(match operation {
            CrudOperation::Save => SAVE_ADDRESS_SQL,
            CrudOperation::FindById => FIND_ADDRESS_BY_ID_SQL,
            CrudOperation::FindAll => FIND_ALL_ADDRESSES_SQL,
            CrudOperation::Count => COUNT_ADDRESSES_SQL,
            CrudOperation::Update => UPDATE_ADDRESS_SQL,
            CrudOperation::DeleteOne => DELETE_ADDRESS_SQL,
            CrudOperation::DeleteMany => DELETE_ADDRESSES_IN_SQL,
        })
    }

    fn map_for_save(&self, _store: &dyn Store, address: &mut Address) -> Result<Vec<SqlValue>> {
        Ok(Self::columns(address))
    }

    fn map_for_update(&self, address: &Address) -> Result<Vec<SqlValue>> {
        Ok(Self::columns(address))
    }

    fn extract_entity(&self, row: &Row) -> Result<Address> {
        extract_address(&self.binder, row, "")?.ok_or_else(|| OrmError::UnexpectedNull {
            alias: "ID".to_string(),
        })
    }
}

/// CRUD access to the ADDRESSES table
pub struct AddressRepository<'s> {
    inner: CrudRepository<'s, AddressMapping>,
}

impl<'s> AddressRepository<'s> {
    pub fn new(store: &'s dyn Store) -> Result<Self> {
        Ok(Self {
            inner: CrudRepository::new(store, AddressMapping::new()?)?,
        })
    }
}

impl<'s> Deref for AddressRepository<'s> {
    type Target = CrudRepository<'s, AddressMapping>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
