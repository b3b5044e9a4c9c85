//! People repository
//!
//! Every statement is declared as an override, grouped by the mapping point
//! it serves. Saving a person cascades: addresses and an unsaved spouse are
//! inserted before the person row, children after it.

use crate::errors::Result;
use crate::repo::address_repo::AddressRepository;
use crate::repo::hydration::AliasExtractor;
use peopledb_core::crud::{CrudRepository, EntityMapping};
use peopledb_core::errors::OrmError;
use peopledb_core::model::{Address, Person};
use peopledb_core::operation::{CrudOperation, SqlOverride, SqlOverrides};
use peopledb_core::row::Row;
use peopledb_core::store::Store;
use peopledb_core::value::SqlValue;
use std::collections::HashSet;
use std::ops::Deref;

/// Aliased projection of a person, both addresses, the spouse and the
/// spouse's addresses
macro_rules! person_select {
    () => {
        "SELECT \
P.ID AS P_ID, P.FIRST_NAME AS P_FIRST_NAME, P.LAST_NAME AS P_LAST_NAME, P.DOB AS P_DOB, \
P.SALARY AS P_SALARY, P.EMAIL AS P_EMAIL, P.HOME_ADDRESS AS P_HOME_ADDRESS, \
P.BUSINESS_ADDRESS AS P_BUSINESS_ADDRESS, P.SPOUSE_ID AS P_SPOUSE_ID, P.PARENT_ID AS P_PARENT_ID, \
HOME.ID AS HOME_ID, HOME.STREET_ADDRESS AS HOME_STREET_ADDRESS, HOME.ADDRESS2 AS HOME_ADDRESS2, \
HOME.CITY AS HOME_CITY, HOME.STATE AS HOME_STATE, HOME.POSTCODE AS HOME_POSTCODE, \
HOME.COUNTY AS HOME_COUNTY, HOME.REGION AS HOME_REGION, HOME.COUNTRY AS HOME_COUNTRY, \
BUSINESS.ID AS BUSINESS_ID, BUSINESS.STREET_ADDRESS AS BUSINESS_STREET_ADDRESS, \
BUSINESS.ADDRESS2 AS BUSINESS_ADDRESS2, BUSINESS.CITY AS BUSINESS_CITY, \
BUSINESS.STATE AS BUSINESS_STATE, BUSINESS.POSTCODE AS BUSINESS_POSTCODE, \
BUSINESS.COUNTY AS BUSINESS_COUNTY, BUSINESS.REGION AS BUSINESS_REGION, \
BUSINESS.COUNTRY AS BUSINESS_COUNTRY, \
S.ID AS S_ID, S.FIRST_NAME AS S_FIRST_NAME, S.LAST_NAME AS S_LAST_NAME, S.DOB AS S_DOB, \
S.SALARY AS S_SALARY, S.EMAIL AS S_EMAIL, S.PARENT_ID AS S_PARENT_ID, \
SH.ID AS SH_ID, SH.STREET_ADDRESS AS SH_STREET_ADDRESS, SH.ADDRESS2 AS SH_ADDRESS2, \
SH.CITY AS SH_CITY, SH.STATE AS SH_STATE, SH.POSTCODE AS SH_POSTCODE, \
SH.COUNTY AS SH_COUNTY, SH.REGION AS SH_REGION, SH.COUNTRY AS SH_COUNTRY, \
SB.ID AS SB_ID, SB.STREET_ADDRESS AS SB_STREET_ADDRESS, SB.ADDRESS2 AS SB_ADDRESS2, \
SB.CITY AS SB_CITY, SB.STATE AS SB_STATE, SB.POSTCODE AS SB_POSTCODE, \
SB.COUNTY AS SB_COUNTY, SB.REGION AS SB_REGION, SB.COUNTRY AS SB_COUNTRY \
FROM PEOPLE AS P \
LEFT JOIN ADDRESSES AS HOME ON P.HOME_ADDRESS = HOME.ID \
LEFT JOIN ADDRESSES AS BUSINESS ON P.BUSINESS_ADDRESS = BUSINESS.ID \
LEFT JOIN PEOPLE AS S ON P.SPOUSE_ID = S.ID \
LEFT JOIN ADDRESSES AS SH ON S.HOME_ADDRESS = SH.ID \
LEFT JOIN ADDRESSES AS SB ON S.BUSINESS_ADDRESS = SB.ID"
    };
}

pub const SAVE_PERSON_SQL: &str = "INSERT INTO PEOPLE \
    (FIRST_NAME, LAST_NAME, DOB, SALARY, EMAIL, HOME_ADDRESS, BUSINESS_ADDRESS, SPOUSE_ID, PARENT_ID) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)";
pub const FIND_BY_ID_SQL: &str = concat!(person_select!(), " WHERE P.ID = ?");
pub const FIND_ALL_SQL: &str = concat!(person_select!(), " ORDER BY P.ID");
pub const FIND_CHILDREN_SQL: &str = concat!(person_select!(), " WHERE P.PARENT_ID = ? ORDER BY P.ID");
pub const SELECT_COUNT_SQL: &str = "SELECT COUNT(*) FROM PEOPLE";
pub const DELETE_SQL: &str = "DELETE FROM PEOPLE WHERE ID = ?";
pub const DELETE_IN_SQL: &str = "DELETE FROM PEOPLE WHERE ID IN (:ids)";
pub const UPDATE_SQL: &str =
    "UPDATE PEOPLE SET FIRST_NAME = ?, LAST_NAME = ?, DOB = ?, SALARY = ? WHERE ID = ?";

/// Statement overrides keyed by the mapping point they belong to
pub fn people_overrides() -> Result<SqlOverrides> {
    SqlOverrides::builder()
        .attach(
            "map_for_save",
            [SqlOverride::new(CrudOperation::Save, SAVE_PERSON_SQL)],
        )
        .attach(
            "map_for_update",
            [SqlOverride::new(CrudOperation::Update, UPDATE_SQL)],
        )
        .attach(
            "extract_entity",
            [
                SqlOverride::new(CrudOperation::FindById, FIND_BY_ID_SQL),
                SqlOverride::new(CrudOperation::FindAll, FIND_ALL_SQL),
                SqlOverride::new(CrudOperation::Count, SELECT_COUNT_SQL),
                SqlOverride::new(CrudOperation::DeleteOne, DELETE_SQL),
                SqlOverride::new(CrudOperation::DeleteMany, DELETE_IN_SQL),
            ],
        )
        .build()
}

#[derive(Debug)]
pub struct PersonMapping {
    overrides: SqlOverrides,
    extractor: AliasExtractor,
}

impl PersonMapping {
    pub fn new() -> Result<Self> {
        Ok(Self {
            overrides: people_overrides()?,
            extractor: AliasExtractor::new()?,
        })
    }
}

/// Insert the address in `slot`, if any, and return its new id
///
/// An address that already has an id is replaced by a detached copy first;
/// addresses are never shared between rows.
fn save_address(repo: &AddressRepository<'_>, slot: &mut Option<Address>) -> Result<Option<i64>> {
    let Some(address) = slot.as_mut() else {
        return Ok(None);
    };
    if address.id().is_some() {
        *address = address.detached();
    }
    repo.save_in_place(address)?;
    Ok(address.id())
}

/// Id to store in SPOUSE_ID, saving a new spouse through a fresh repository
fn save_spouse(store: &dyn Store, slot: &mut Option<Box<Person>>) -> Result<Option<i64>> {
    let Some(spouse) = slot.as_mut() else {
        return Ok(None);
    };
    if let Some(id) = spouse.id() {
        return Ok(Some(id));
    }
    PeopleRepository::new(store)?.save_in_place(spouse)?;
    Ok(spouse.id())
}

/// Reject what the cascade would only discover after rows are written:
/// an identified child (saved in `post_save`, after the parent row) or an
/// unstorable date of birth anywhere in the unsaved part of the graph
fn check_cascade(person: &Person) -> Result<()> {
    SqlValue::checked_timestamp(&person.dob)?;
    if let Some(spouse) = person.spouse.as_deref().filter(|s| s.id().is_none()) {
        check_cascade(spouse)?;
    }
    for child in &person.children {
        if let Some(id) = child.id() {
            return Err(OrmError::AlreadyPersisted {
                entity_type: "Person",
                id,
            });
        }
        check_cascade(child)?;
    }
    Ok(())
}

fn load_children(
    repo: &CrudRepository<'_, PersonMapping>,
    person: &mut Person,
    visited: &mut HashSet<i64>,
) -> Result<()> {
    let Some(id) = person.id() else {
        return Ok(());
    };
    if !visited.insert(id) {
        return Ok(());
    }

    let mut children = repo.query_entities(FIND_CHILDREN_SQL, &[SqlValue::Integer(id)])?;
    for child in &mut children {
        load_children(repo, child, visited)?;
    }
    person.children = children;
    Ok(())
}

impl EntityMapping for PersonMapping {
    type Entity = Person;

    fn sql_overrides(&self) -> Option<&SqlOverrides> {
        Some(&self.overrides)
    }

    fn map_for_save(&self, store: &dyn Store, person: &mut Person) -> Result<Vec<SqlValue>> {
        check_cascade(person)?;
        let dob = SqlValue::checked_timestamp(&person.dob)?;

        let addresses = AddressRepository::new(store)?;
        let home = save_address(&addresses, &mut person.home_address)?;
        let business = save_address(&addresses, &mut person.business_address)?;
        let spouse = save_spouse(store, &mut person.spouse)?;

        Ok(vec![
            person.first_name.as_str().into(),
            person.last_name.as_str().into(),
            dob,
            person.salary.into(),
            person.email.clone().into(),
            home.into(),
            business.into(),
            spouse.into(),
            person.parent_id.into(),
        ])
    }

    fn map_for_update(&self, person: &Person) -> Result<Vec<SqlValue>> {
        Ok(vec![
            person.first_name.as_str().into(),
            person.last_name.as_str().into(),
            SqlValue::checked_timestamp(&person.dob)?,
            person.salary.into(),
        ])
    }

    fn extract_entity(&self, row: &Row) -> Result<Person> {
        self.extractor.extract_person(row)
    }

    fn post_save(&self, repo: &CrudRepository<'_, Self>, person: &mut Person) -> Result<()> {
        let parent_id = repo.binder().get_id(person)?;
        for child in &mut person.children {
            child.parent_id = Some(parent_id);
            repo.save_in_place(child)?;
        }
        Ok(())
    }

    fn post_find(&self, repo: &CrudRepository<'_, Self>, person: &mut Person) -> Result<()> {
        let mut visited = HashSet::new();
        load_children(repo, person, &mut visited)
    }
}

/// CRUD access to the PEOPLE table with cascading saves
pub struct PeopleRepository<'s> {
    inner: CrudRepository<'s, PersonMapping>,
}

impl<'s> PeopleRepository<'s> {
    pub fn new(store: &'s dyn Store) -> Result<Self> {
        Ok(Self {
            inner: CrudRepository::new(store, PersonMapping::new()?)?,
        })
    }

    /// Direct children of a person, in id order, without their descendants
    pub fn find_children(&self, parent_id: i64) -> Result<Vec<Person>> {
        self.inner
            .query_entities(FIND_CHILDREN_SQL, &[SqlValue::Integer(parent_id)])
    }
}

impl<'s> Deref for PeopleRepository<'s> {
    type Target = CrudRepository<'s, PersonMapping>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
