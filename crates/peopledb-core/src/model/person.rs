use crate::entity::{Entity, EntityDescriptor};
use crate::value::SqlValue;
use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use super::address::Address;

/// A person with owned addresses, spouse and children
///
/// Equality covers the identifier, both names and the date of birth compared
/// as an instant; two values with the same instant in different offsets are
/// equal. Salary, email, addresses and relations are not compared.
#[derive(Debug, Clone, Serialize)]
pub struct Person {
    id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub dob: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spouse: Option<Box<Person>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Person>,
    /// Identifier of the parent row; supplies PARENT_ID on save
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

impl Person {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        dob: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            dob,
            salary: None,
            email: None,
            home_address: None,
            business_address: None,
            spouse: None,
            children: Vec::new(),
            parent_id: None,
        }
    }

    pub fn with_salary(mut self, salary: Decimal) -> Self {
        self.salary = Some(salary);
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_home_address(mut self, address: Address) -> Self {
        self.home_address = Some(address);
        self
    }

    pub fn with_business_address(mut self, address: Address) -> Self {
        self.business_address = Some(address);
        self
    }

    pub fn with_spouse(mut self, spouse: Person) -> Self {
        self.spouse = Some(Box::new(spouse));
        self
    }

    pub fn with_child(mut self, child: Person) -> Self {
        self.children.push(child);
        self
    }

    /// Store-assigned identifier, `None` until saved
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Date of birth as a UTC instant
    pub fn dob_utc(&self) -> DateTime<Utc> {
        self.dob.with_timezone(&Utc)
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.first_name == other.first_name
            && self.last_name == other.last_name
            && self.dob_utc() == other.dob_utc()
    }
}

impl Eq for Person {}

impl Hash for Person {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.first_name.hash(state);
        self.last_name.hash(state);
        self.dob_utc().hash(state);
    }
}

impl Entity for Person {
    fn descriptor() -> &'static EntityDescriptor<Self> {
        static DESCRIPTOR: OnceLock<EntityDescriptor<Person>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            EntityDescriptor::<Person>::new("Person")
                .identifier("id", |p| p.id.into(), |p, id| p.id = Some(id))
                .attribute("first_name", |p| p.first_name.as_str().into())
                .attribute("last_name", |p| p.last_name.as_str().into())
                .attribute("dob", |p| SqlValue::timestamp(&p.dob))
                .attribute("salary", |p| p.salary.into())
                .attribute("email", |p| p.email.clone().into())
        })
    }
}
