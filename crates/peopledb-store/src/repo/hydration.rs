//! Hydration layer - rebuilds people and addresses from joined rows
//!
//! The people query repeats the PEOPLE and ADDRESSES columns several times
//! under different aliases, so every value is looked up by `PREFIX_COLUMN`.
//! A sub-object whose `PREFIX_ID` is NULL is absent from the row.

use crate::errors::Result;
use peopledb_core::entity::IdentifierBinder;
use peopledb_core::errors::OrmError;
use peopledb_core::model::{Address, Person, Region};
use peopledb_core::row::Row;

/// Alias prefix of the person a row describes
pub const PERSON_PREFIX: &str = "P_";
pub const HOME_PREFIX: &str = "HOME_";
pub const BUSINESS_PREFIX: &str = "BUSINESS_";
pub const SPOUSE_PREFIX: &str = "S_";
pub const SPOUSE_HOME_PREFIX: &str = "SH_";
pub const SPOUSE_BUSINESS_PREFIX: &str = "SB_";

fn alias(prefix: &str, column: &str) -> String {
    format!("{prefix}{column}")
}

/// Extract an address under `prefix`, or `None` when its id is NULL
pub fn extract_address(
    binder: &IdentifierBinder<Address>,
    row: &Row,
    prefix: &str,
) -> Result<Option<Address>> {
    let Some(id) = row.opt_i64(&alias(prefix, "ID"))? else {
        return Ok(None);
    };

    let region_alias = alias(prefix, "REGION");
    let region = row
        .string(&region_alias)?
        .parse::<Region>()
        .map_err(|e| OrmError::InvalidValue {
            alias: region_alias.clone(),
            reason: e.to_string(),
        })?;

    let mut address = Address::new(
        row.string(&alias(prefix, "STREET_ADDRESS"))?,
        row.string(&alias(prefix, "CITY"))?,
        row.string(&alias(prefix, "STATE"))?,
        row.string(&alias(prefix, "POSTCODE"))?,
        row.string(&alias(prefix, "COUNTRY"))?,
        region,
    );
    address.address2 = row.opt_string(&alias(prefix, "ADDRESS2"))?;
    address.county = row.opt_string(&alias(prefix, "COUNTY"))?;
    binder.set_id(&mut address, id)?;
    Ok(Some(address))
}

/// Rebuilds a `Person` graph from one row of the aliased people join
#[derive(Debug)]
pub struct AliasExtractor {
    person: IdentifierBinder<Person>,
    address: IdentifierBinder<Address>,
}

impl AliasExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            person: IdentifierBinder::for_entity()?,
            address: IdentifierBinder::for_entity()?,
        })
    }

    pub fn address_binder(&self) -> &IdentifierBinder<Address> {
        &self.address
    }

    /// The row's person with both addresses and, if linked, the spouse
    pub fn extract_person(&self, row: &Row) -> Result<Person> {
        let id = row.i64(&alias(PERSON_PREFIX, "ID"))?;
        let mut person = self.person_columns(row, PERSON_PREFIX, id)?;
        person.home_address = extract_address(&self.address, row, HOME_PREFIX)?;
        person.business_address = extract_address(&self.address, row, BUSINESS_PREFIX)?;
        person.spouse = self.extract_spouse(row)?.map(Box::new);
        Ok(person)
    }

    /// The self-joined spouse with their own addresses; their spouse and
    /// children are not part of the row
    fn extract_spouse(&self, row: &Row) -> Result<Option<Person>> {
        let Some(id) = row.opt_i64(&alias(SPOUSE_PREFIX, "ID"))? else {
            return Ok(None);
        };
        let mut spouse = self.person_columns(row, SPOUSE_PREFIX, id)?;
        spouse.home_address = extract_address(&self.address, row, SPOUSE_HOME_PREFIX)?;
        spouse.business_address = extract_address(&self.address, row, SPOUSE_BUSINESS_PREFIX)?;
        Ok(Some(spouse))
    }

    fn person_columns(&self, row: &Row, prefix: &str, id: i64) -> Result<Person> {
        let mut person = Person::new(
            row.string(&alias(prefix, "FIRST_NAME"))?,
            row.string(&alias(prefix, "LAST_NAME"))?,
            row.timestamp(&alias(prefix, "DOB"))?,
        );
        person.salary = row.opt_decimal(&alias(prefix, "SALARY"))?;
        person.email = row.opt_string(&alias(prefix, "EMAIL"))?;
        person.parent_id = row.opt_i64(&alias(prefix, "PARENT_ID"))?;
        self.person.set_id(&mut person, id)?;
        Ok(person)
    }
}
