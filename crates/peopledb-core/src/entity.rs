//! Entity descriptors and identifier binding
//!
//! Each entity type registers a descriptor once: its declared attributes,
//! each with a reader, and a capability marker on the one attribute that is
//! the identifier. The binder locates that attribute through the marker and
//! reads or writes it directly, so entities need no public id setter.

use crate::errors::{OrmError, Result};
use crate::value::SqlValue;

/// Capability marker carried by an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMarker {
    Identifier,
}

/// One declared attribute of an entity type
pub struct Attribute<T> {
    pub name: &'static str,
    pub marker: Option<FieldMarker>,
    read: fn(&T) -> SqlValue,
    write: Option<fn(&mut T, i64)>,
}

impl<T> Attribute<T> {
    pub fn read(&self, entity: &T) -> SqlValue {
        (self.read)(entity)
    }

    pub fn is_identifier(&self) -> bool {
        self.marker == Some(FieldMarker::Identifier)
    }
}

impl<T> std::fmt::Debug for Attribute<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("marker", &self.marker)
            .finish()
    }
}

/// Per-type registry of declared attributes
#[derive(Debug)]
pub struct EntityDescriptor<T> {
    type_name: &'static str,
    attributes: Vec<Attribute<T>>,
}

impl<T> EntityDescriptor<T> {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            attributes: Vec::new(),
        }
    }

    /// Declare the identifier attribute with its reader and direct writer
    pub fn identifier(
        mut self,
        name: &'static str,
        read: fn(&T) -> SqlValue,
        write: fn(&mut T, i64),
    ) -> Self {
        self.attributes.push(Attribute {
            name,
            marker: Some(FieldMarker::Identifier),
            read,
            write: Some(write),
        });
        self
    }

    /// Declare a plain attribute
    pub fn attribute(mut self, name: &'static str, read: fn(&T) -> SqlValue) -> Self {
        self.attributes.push(Attribute {
            name,
            marker: None,
            read,
            write: None,
        });
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn attributes(&self) -> &[Attribute<T>] {
        &self.attributes
    }

    /// `Type{attr=value, ...}` rendering of every declared attribute
    pub fn describe(&self, entity: &T) -> String {
        let fields: Vec<String> = self
            .attributes
            .iter()
            .map(|attr| format!("{}={}", attr.name, attr.read(entity)))
            .collect();
        format!("{}{{{}}}", self.type_name, fields.join(", "))
    }
}

/// A persistable domain type
pub trait Entity: Sized + 'static {
    fn descriptor() -> &'static EntityDescriptor<Self>;
}

/// Reads and writes the identifier attribute of `T`
pub struct IdentifierBinder<T: 'static> {
    descriptor: &'static EntityDescriptor<T>,
    attribute: &'static Attribute<T>,
    write: fn(&mut T, i64),
}

impl<T: Entity> IdentifierBinder<T> {
    /// Locate the unique identifier attribute of `T`
    pub fn for_entity() -> Result<Self> {
        Self::from_descriptor(T::descriptor())
    }
}

impl<T: 'static> IdentifierBinder<T> {
    pub fn from_descriptor(descriptor: &'static EntityDescriptor<T>) -> Result<Self> {
        let marked: Vec<&'static Attribute<T>> = descriptor
            .attributes
            .iter()
            .filter(|attr| attr.is_identifier())
            .collect();

        match marked.as_slice() {
            [] => Err(OrmError::NoIdentifier {
                entity_type: descriptor.type_name,
            }),
            [attribute] => {
                let attribute = *attribute;
                let write = attribute.write.ok_or(OrmError::NoIdentifier {
                    entity_type: descriptor.type_name,
                })?;
                Ok(Self {
                    descriptor,
                    attribute,
                    write,
                })
            }
            many => Err(OrmError::MultipleIdentifiers {
                entity_type: descriptor.type_name,
                count: many.len(),
            }),
        }
    }

    pub fn entity_type(&self) -> &'static str {
        self.descriptor.type_name
    }

    pub fn attribute_name(&self) -> &'static str {
        self.attribute.name
    }

    /// Current identifier, `None` before first persistence
    pub fn current_id(&self, entity: &T) -> Result<Option<i64>> {
        match self.attribute.read(entity) {
            SqlValue::Null => Ok(None),
            SqlValue::Integer(id) => Ok(Some(id)),
            other => Err(OrmError::NonNumericIdentifier {
                entity_type: self.descriptor.type_name,
                value: other.to_string(),
            }),
        }
    }

    /// Identifier of a persisted entity
    pub fn get_id(&self, entity: &T) -> Result<i64> {
        self.current_id(entity)?
            .ok_or(OrmError::IdentifierNotAssigned {
                entity_type: self.descriptor.type_name,
            })
    }

    /// Assign the identifier; an assigned identifier never changes
    pub fn set_id(&self, entity: &mut T, id: i64) -> Result<()> {
        match self.current_id(entity)? {
            None => {
                (self.write)(entity, id);
                Ok(())
            }
            Some(current) if current == id => Ok(()),
            Some(current) => Err(OrmError::IdentifierAlreadyAssigned {
                entity_type: self.descriptor.type_name,
                current,
                attempted: id,
            }),
        }
    }

    pub fn describe(&self, entity: &T) -> String {
        self.descriptor.describe(entity)
    }
}

impl<T: 'static> std::fmt::Debug for IdentifierBinder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentifierBinder")
            .field("entity_type", &self.descriptor.type_name)
            .field("attribute", &self.attribute.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    #[derive(Debug, Default)]
    struct Ticket {
        key: Option<i64>,
        title: String,
    }

    impl Entity for Ticket {
        fn descriptor() -> &'static EntityDescriptor<Self> {
            static DESCRIPTOR: OnceLock<EntityDescriptor<Ticket>> = OnceLock::new();
            DESCRIPTOR.get_or_init(|| {
                EntityDescriptor::<Ticket>::new("Ticket")
                    .identifier("key", |t| t.key.into(), |t, id| t.key = Some(id))
                    .attribute("title", |t| t.title.as_str().into())
            })
        }
    }

    struct Untagged;

    fn untagged_descriptor() -> &'static EntityDescriptor<Untagged> {
        static DESCRIPTOR: OnceLock<EntityDescriptor<Untagged>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            EntityDescriptor::<Untagged>::new("Untagged").attribute("x", |_| SqlValue::Integer(1))
        })
    }

    struct Labelled;

    fn labelled_descriptor() -> &'static EntityDescriptor<Labelled> {
        static DESCRIPTOR: OnceLock<EntityDescriptor<Labelled>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            EntityDescriptor::<Labelled>::new("Labelled").identifier("code", |_| "A-1".into(), |_, _| {})
        })
    }

    #[test]
    fn test_binder_finds_marked_attribute_regardless_of_name() {
        let binder = IdentifierBinder::<Ticket>::for_entity().unwrap();
        assert_eq!(binder.attribute_name(), "key");
        assert_eq!(binder.entity_type(), "Ticket");
    }

    #[test]
    fn test_set_then_get() {
        let binder = IdentifierBinder::<Ticket>::for_entity().unwrap();
        let mut ticket = Ticket::default();

        assert_eq!(binder.current_id(&ticket).unwrap(), None);
        binder.set_id(&mut ticket, 42).unwrap();
        assert_eq!(binder.get_id(&ticket).unwrap(), 42);
        assert_eq!(ticket.key, Some(42));
    }

    #[test]
    fn test_unassigned_get_is_binding_error() {
        let binder = IdentifierBinder::<Ticket>::for_entity().unwrap();
        let err = binder.get_id(&Ticket::default()).unwrap_err();
        assert_eq!(err.code(), "ERR_BINDING");
    }

    #[test]
    fn test_assigned_identifier_is_immutable() {
        let binder = IdentifierBinder::<Ticket>::for_entity().unwrap();
        let mut ticket = Ticket::default();
        binder.set_id(&mut ticket, 1).unwrap();

        binder.set_id(&mut ticket, 1).unwrap();
        let err = binder.set_id(&mut ticket, 2).unwrap_err();
        assert_eq!(
            err,
            OrmError::IdentifierAlreadyAssigned {
                entity_type: "Ticket",
                current: 1,
                attempted: 2
            }
        );
        assert_eq!(ticket.key, Some(1));
    }

    #[test]
    fn test_no_marked_attribute_fails_at_registration() {
        let err = IdentifierBinder::from_descriptor(untagged_descriptor()).unwrap_err();
        assert_eq!(
            err,
            OrmError::NoIdentifier {
                entity_type: "Untagged"
            }
        );
    }

    #[test]
    fn test_non_numeric_identifier() {
        let binder = IdentifierBinder::from_descriptor(labelled_descriptor()).unwrap();
        let err = binder.get_id(&Labelled).unwrap_err();
        assert!(matches!(err, OrmError::NonNumericIdentifier { .. }));
    }

    #[test]
    fn test_describe_lists_attributes() {
        let ticket = Ticket {
            key: None,
            title: "Leaky roof".to_string(),
        };
        assert_eq!(
            Ticket::descriptor().describe(&ticket),
            "Ticket{key=null, title=Leaky roof}"
        );
    }
}
