use crate::entity::{Entity, EntityDescriptor};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::region::Region;

/// A postal address owned by exactly one slot of one person
///
/// Addresses are never shared or deduplicated: each save of the owning
/// person inserts a fresh row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    pub street_address: String,
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub county: Option<String>,
    pub region: Region,
    pub country: String,
}

impl Address {
    pub fn new(
        street_address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postcode: impl Into<String>,
        country: impl Into<String>,
        region: Region,
    ) -> Self {
        Self {
            id: None,
            street_address: street_address.into(),
            address2: None,
            city: city.into(),
            state: state.into(),
            postcode: postcode.into(),
            county: None,
            region,
            country: country.into(),
        }
    }

    pub fn with_address2(mut self, address2: impl Into<String>) -> Self {
        self.address2 = Some(address2.into());
        self
    }

    pub fn with_county(mut self, county: impl Into<String>) -> Self {
        self.county = Some(county.into());
        self
    }

    /// Store-assigned identifier, `None` until saved
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Copy of this address without its identifier
    pub fn detached(&self) -> Self {
        Self {
            id: None,
            ..self.clone()
        }
    }
}

impl Entity for Address {
    fn descriptor() -> &'static EntityDescriptor<Self> {
        static DESCRIPTOR: OnceLock<EntityDescriptor<Address>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            EntityDescriptor::<Address>::new("Address")
                .identifier("id", |a| a.id.into(), |a, id| a.id = Some(id))
                .attribute("street_address", |a| a.street_address.as_str().into())
                .attribute("address2", |a| a.address2.clone().into())
                .attribute("city", |a| a.city.as_str().into())
                .attribute("state", |a| a.state.as_str().into())
                .attribute("postcode", |a| a.postcode.as_str().into())
                .attribute("county", |a| a.county.clone().into())
                .attribute("region", |a| a.region.as_str().into())
                .attribute("country", |a| a.country.as_str().into())
        })
    }
}
