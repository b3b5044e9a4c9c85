use crate::operation::CrudOperation;
use thiserror::Error;

/// Result type alias using OrmError
pub type Result<T> = std::result::Result<T, OrmError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every `OrmError` maps onto exactly one kind, and each kind carries a
/// stable code usable for programmatic handling, tests and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrmErrorKind {
    /// No override and no usable default SQL, or an invalid override table
    Resolution,
    /// Identifier attribute missing, duplicated, unassigned or non-numeric
    Binding,
    /// An expected column alias is absent or holds an unusable value
    Extraction,
    /// A save failed; wraps the underlying failure
    Persistence,
    /// The store rejected a statement outside of save
    Store,
}

impl OrmErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            OrmErrorKind::Resolution => "ERR_RESOLUTION",
            OrmErrorKind::Binding => "ERR_BINDING",
            OrmErrorKind::Extraction => "ERR_EXTRACTION",
            OrmErrorKind::Persistence => "ERR_PERSISTENCE",
            OrmErrorKind::Store => "ERR_STORE",
        }
    }
}

/// Failure reported by a store implementation
///
/// Store drivers convert their native errors into this type so the engine
/// never depends on a particular driver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("store failure in operation '{op}': {message}")]
pub struct StoreError {
    op: String,
    message: String,
}

impl StoreError {
    /// Create a new store error with a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            op: "store".to_string(),
            message: message.into(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = op.into();
        self
    }

    /// Get the operation context
    pub fn op(&self) -> &str {
        &self.op
    }

    /// Get the driver message
    pub fn message(&self) -> &str {
        &self.message
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for repository operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrmError {
    // ===== Resolution Errors =====
    /// Neither an override nor a built-in statement exists for the operation
    #[error("SQL not defined for operation {operation}")]
    SqlNotDefined { operation: CrudOperation },

    /// Two overrides were declared for the same operation
    #[error("Duplicate SQL override for operation {operation}: declared at '{first}' and '{second}'")]
    DuplicateOverride {
        operation: CrudOperation,
        first: &'static str,
        second: &'static str,
    },

    /// A delete-many template lacks the id-list placeholder
    #[error("SQL for operation {operation} does not contain the '{placeholder}' placeholder")]
    MissingPlaceholder {
        operation: CrudOperation,
        placeholder: &'static str,
    },

    // ===== Binding Errors =====
    /// The entity descriptor declares no identifier attribute
    #[error("No identifier attribute found on {entity_type}")]
    NoIdentifier { entity_type: &'static str },

    /// The entity descriptor declares more than one identifier attribute
    #[error("{entity_type} declares {count} identifier attributes, expected exactly one")]
    MultipleIdentifiers {
        entity_type: &'static str,
        count: usize,
    },

    /// The identifier has not been assigned yet
    #[error("Identifier of {entity_type} is not assigned")]
    IdentifierNotAssigned { entity_type: &'static str },

    /// The identifier holds something other than an integer
    #[error("Identifier of {entity_type} is not numeric: {value}")]
    NonNumericIdentifier {
        entity_type: &'static str,
        value: String,
    },

    /// An assigned identifier cannot be replaced
    #[error("Identifier of {entity_type} is already assigned ({current}), refusing {attempted}")]
    IdentifierAlreadyAssigned {
        entity_type: &'static str,
        current: i64,
        attempted: i64,
    },

    /// `save` was called on an entity that already has an identifier
    #[error("{entity_type} is already persisted with id {id}")]
    AlreadyPersisted { entity_type: &'static str, id: i64 },

    /// An instant whose UTC year has no four-digit RFC 3339 form
    #[error("Timestamp {value} is outside the storable range (UTC years 0000-9999)")]
    TimestampOutOfRange { value: String },

    // ===== Extraction Errors =====
    /// No column in the row carries the alias
    #[error("Column not found for alias: '{alias}'")]
    ColumnNotFound { alias: String },

    /// A required column holds NULL
    #[error("Unexpected NULL for alias: '{alias}'")]
    UnexpectedNull { alias: String },

    /// A column holds a value that cannot be converted
    #[error("Invalid value for alias '{alias}': {reason}")]
    InvalidValue { alias: String, reason: String },

    // ===== Persistence Errors =====
    /// A save failed
    #[error("Tried to save {entity}: {source}")]
    Persistence {
        entity: String,
        #[source]
        source: Box<OrmError>,
    },

    // ===== Store Errors =====
    /// The store rejected a statement
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OrmError {
    /// Classify this error
    pub fn kind(&self) -> OrmErrorKind {
        match self {
            OrmError::SqlNotDefined { .. }
            | OrmError::DuplicateOverride { .. }
            | OrmError::MissingPlaceholder { .. } => OrmErrorKind::Resolution,

            OrmError::NoIdentifier { .. }
            | OrmError::MultipleIdentifiers { .. }
            | OrmError::IdentifierNotAssigned { .. }
            | OrmError::NonNumericIdentifier { .. }
            | OrmError::IdentifierAlreadyAssigned { .. }
            | OrmError::AlreadyPersisted { .. }
            | OrmError::TimestampOutOfRange { .. } => OrmErrorKind::Binding,

            OrmError::ColumnNotFound { .. }
            | OrmError::UnexpectedNull { .. }
            | OrmError::InvalidValue { .. } => OrmErrorKind::Extraction,

            OrmError::Persistence { .. } => OrmErrorKind::Persistence,

            OrmError::Store(_) => OrmErrorKind::Store,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Wrap a failure raised while saving `entity`
    pub fn persistence(entity: impl Into<String>, source: OrmError) -> Self {
        OrmError::Persistence {
            entity: entity.into(),
            source: Box::new(source),
        }
    }

    /// The innermost cause of a chain of persistence failures
    pub fn root_cause(&self) -> &OrmError {
        match self {
            OrmError::Persistence { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
