use folio_core_types::{RequestId, TraceId};
use thiserror::Error;

use crate::model::{EntityKind, EntityRef};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (the admin layer, the
/// CLI, tests) can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Lookup
    /// Content entity or version does not exist (404-equivalent)
    NotFound,

    // Request shape
    /// Operation not available for this content kind (400-equivalent)
    UnsupportedOperation,
    /// Malformed draft payload, rejected before any write
    ValidationError,
    /// Malformed identifier or argument
    InvalidInput,

    // Versioning
    /// Version allocation or flag flip lost a race; transient
    ConcurrentModification,
    /// A persisted invariant was found broken (migration checksum, flag holders)
    ConstraintViolation,

    // Integration/IO
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::UnsupportedOperation => "ERR_UNSUPPORTED_OPERATION",
            ExErrorKind::ValidationError => "ERR_VALIDATION",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::ConcurrentModification => "ERR_CONCURRENT_MODIFICATION",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether an operation failing with this kind may succeed if retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, ExErrorKind::ConcurrentModification)
    }
}

/// Canonical structured error type
///
/// Carries a classification plus optional context about which entity and
/// version the failing operation was touching.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_kind: Option<EntityKind>,
    entity_id: Option<i64>,
    version_number: Option<u32>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_kind: None,
            entity_id: None,
            version_number: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add owning entity context
    pub fn with_entity(mut self, entity: EntityRef) -> Self {
        self.entity_kind = Some(entity.kind);
        self.entity_id = Some(entity.id);
        self
    }

    pub fn with_entity_kind(mut self, kind: EntityKind) -> Self {
        self.entity_kind = Some(kind);
        self
    }

    pub fn with_version_number(mut self, version_number: u32) -> Self {
        self.version_number = Some(version_number);
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_kind(&self) -> Option<EntityKind> {
        self.entity_kind
    }

    pub fn entity_id(&self) -> Option<i64> {
        self.entity_id
    }

    pub fn version_number(&self) -> Option<u32> {
        self.version_number
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        match (self.entity_kind, self.entity_id) {
            (Some(kind), Some(id)) => write!(f, " (entity: {}:{})", kind, id)?,
            (Some(kind), None) => write!(f, " (entity_kind: {})", kind)?,
            _ => {}
        }
        if let Some(version_number) = self.version_number {
            write!(f, " (version: {})", version_number)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain failures raised by content adapters and entity references
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContentError {
    /// Live content record does not exist
    #[error("{kind} {id} not found")]
    EntityNotFound { kind: EntityKind, id: i64 },

    /// Requested version is not part of the entity's history
    #[error("version {version_number} of {entity} not found")]
    VersionNotFound {
        entity: EntityRef,
        version_number: u32,
    },

    /// Entity ids are positive database keys
    #[error("invalid entity id: {id}")]
    InvalidEntityId { id: i64 },

    /// Kind tag not recognised
    #[error("unknown content kind: {tag}")]
    UnknownKind { tag: String },

    /// Entity reference could not be parsed from `kind:id`
    #[error("invalid entity reference: {input}")]
    InvalidEntityRef { input: String },

    /// Payload names a field the kind does not version
    #[error("field `{field}` is not versioned for {kind}")]
    UnknownField { kind: EntityKind, field: String },

    /// Draft payload leaves out a versioned field
    #[error("field `{field}` is required for {kind}")]
    MissingField { kind: EntityKind, field: String },

    /// Payload value has the wrong JSON type for the field
    #[error("field `{field}` expects {expected}, got {found}")]
    FieldTypeMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },

    /// Adapter was handed an entity of another kind
    #[error("adapter for {expected} received a {found} entity")]
    KindMismatch {
        expected: EntityKind,
        found: EntityKind,
    },

    /// Kind does not support parked drafts
    #[error("{kind} does not support drafts")]
    DraftsUnsupported { kind: EntityKind },

    /// No adapter registered for the kind
    #[error("no content adapter registered for {kind}")]
    AdapterMissing { kind: EntityKind },
}

impl From<ContentError> for ExError {
    fn from(err: ContentError) -> Self {
        let message = err.to_string();
        match err {
            ContentError::EntityNotFound { kind, id } => ExError::new(ExErrorKind::NotFound)
                .with_entity(EntityRef { kind, id })
                .with_message(message),

            ContentError::VersionNotFound {
                entity,
                version_number,
            } => ExError::new(ExErrorKind::NotFound)
                .with_entity(entity)
                .with_version_number(version_number)
                .with_message(message),

            ContentError::InvalidEntityId { .. }
            | ContentError::UnknownKind { .. }
            | ContentError::InvalidEntityRef { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }

            ContentError::UnknownField { kind, .. } | ContentError::MissingField { kind, .. } => {
                ExError::new(ExErrorKind::ValidationError)
                    .with_entity_kind(kind)
                    .with_message(message)
            }

            ContentError::FieldTypeMismatch { .. } => {
                ExError::new(ExErrorKind::ValidationError).with_message(message)
            }

            ContentError::KindMismatch { expected, .. } => ExError::new(ExErrorKind::Internal)
                .with_entity_kind(expected)
                .with_message(message),

            ContentError::DraftsUnsupported { kind } | ContentError::AdapterMissing { kind } => {
                ExError::new(ExErrorKind::UnsupportedOperation)
                    .with_entity_kind(kind)
                    .with_message(message)
            }
        }
    }
}
