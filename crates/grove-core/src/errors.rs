use grove_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using GroveError
pub type Result<T> = std::result::Result<T, GroveError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable by callers that need to
/// branch on a failure without matching on `GroveError` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidName,
    InvalidTypeName,
    AlreadyExists,

    // Lookup
    NotFound,
    NotAGroup,

    // Membership
    MultipleGroups,
    CycleDetected,

    // Structural integrity
    InvariantViolation,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidName => "ERR_INVALID_NAME",
            ExErrorKind::InvalidTypeName => "ERR_INVALID_TYPE_NAME",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::NotAGroup => "ERR_NOT_A_GROUP",
            ExErrorKind::MultipleGroups => "ERR_MULTIPLE_GROUPS",
            ExErrorKind::CycleDetected => "ERR_CYCLE_DETECTED",
            ExErrorKind::InvariantViolation => "ERR_INVARIANT_VIOLATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus the context a caller needs to report
/// the failure: which operation, which object, which group and which
/// request it happened in.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    group_id: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            group_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add group ID context
    pub fn with_group_id(mut self, id: impl Into<String>) -> Self {
        self.group_id = Some(id.into());
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

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
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

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
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
        if let Some(group_id) = &self.group_id {
            write!(f, " (group_id: {})", group_id)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for document and membership operations
///
/// Policy rejections, no-op adds/removes and adoption conflicts are not
/// errors; they are reported through return values. These variants cover
/// unknown ids, wrong targets and broken structural invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroveError {
    #[error("Object not found: {object_id}")]
    ObjectNotFound { object_id: String },

    #[error("Object is not a group: {object_id}")]
    NotAGroup { object_id: String },

    #[error("Invalid object name: {reason}")]
    InvalidName { reason: String },

    #[error("Invalid type name: {reason}")]
    InvalidTypeName { reason: String },

    #[error("An object named '{name}' already exists")]
    DuplicateName { name: String },

    /// Raised when a member list is written wholesale with an object that
    /// another base group already owns
    #[error("Object {object_id} can only be in a single group: already in {owner_id}, rejected by {group_id}")]
    MultipleGroups {
        object_id: String,
        owner_id: String,
        group_id: String,
    },

    #[error("Cycle detected: adding {object_id} to {group_id} would make it its own ancestor")]
    CycleDetected { group_id: String, object_id: String },

    // ===== Invariant violations (reported by rules::validation) =====
    #[error("Group {group_id} lists {object_id} more than once")]
    DuplicateMember { group_id: String, object_id: String },

    #[error("Group {group_id} lists unknown object {object_id}")]
    DanglingMember { group_id: String, object_id: String },

    #[error("Object {object_id} is a direct member of several groups: {owner_ids:?}")]
    MultipleOwners {
        object_id: String,
        owner_ids: Vec<String>,
    },

    #[error("Owner index for {object_id} records {indexed:?} but member lists give {actual:?}")]
    OwnerIndexDrift {
        object_id: String,
        indexed: Option<String>,
        actual: Option<String>,
    },
}

impl From<GroveError> for ExError {
    fn from(err: GroveError) -> Self {
        let message = err.to_string();
        match err {
            GroveError::ObjectNotFound { object_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(object_id)
                .with_message(message),

            GroveError::NotAGroup { object_id } => ExError::new(ExErrorKind::NotAGroup)
                .with_entity_id(object_id)
                .with_message(message),

            GroveError::InvalidName { .. } => {
                ExError::new(ExErrorKind::InvalidName).with_message(message)
            }

            GroveError::InvalidTypeName { .. } => {
                ExError::new(ExErrorKind::InvalidTypeName).with_message(message)
            }

            GroveError::DuplicateName { .. } => {
                ExError::new(ExErrorKind::AlreadyExists).with_message(message)
            }

            GroveError::MultipleGroups {
                object_id,
                group_id,
                ..
            } => ExError::new(ExErrorKind::MultipleGroups)
                .with_entity_id(object_id)
                .with_group_id(group_id)
                .with_message(message),

            GroveError::CycleDetected {
                group_id,
                object_id,
            } => ExError::new(ExErrorKind::CycleDetected)
                .with_entity_id(object_id)
                .with_group_id(group_id)
                .with_message(message),

            GroveError::DuplicateMember {
                group_id,
                object_id,
            }
            | GroveError::DanglingMember {
                group_id,
                object_id,
            } => ExError::new(ExErrorKind::InvariantViolation)
                .with_entity_id(object_id)
                .with_group_id(group_id)
                .with_message(message),

            GroveError::MultipleOwners { object_id, .. }
            | GroveError::OwnerIndexDrift { object_id, .. } => {
                ExError::new(ExErrorKind::InvariantViolation)
                    .with_entity_id(object_id)
                    .with_message(message)
            }
        }
    }
}
