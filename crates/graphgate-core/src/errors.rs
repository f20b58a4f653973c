use graphgate_core_types::RequestId;
use thiserror::Error;

use crate::graph::StoreError;
use crate::validation::ValidationReport;

/// Result type alias for caller-facing operations
pub type Result<T> = std::result::Result<T, ClassifiedError>;

// ========== Error Facility ==========

/// Caller-visible error codes
///
/// This is the stable taxonomy the API layer branches on. Each variant maps
/// to exactly one machine-readable code string that never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Payload problems, detected before any store round trip
    ValidationError,
    BadUserInput,

    // Uniqueness
    DuplicateUser,
    DuplicatePost,

    // Missing targets
    NotFound,
    UserNotFound,
    PostNotFound,

    // Store
    DatabaseError,
    PostCreationFailed,

    // Internal
    InternalServerError,
}

impl ErrorCode {
    /// Get the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::BadUserInput => "BAD_USER_INPUT",
            ErrorCode::DuplicateUser => "DUPLICATE_USER",
            ErrorCode::DuplicatePost => "DUPLICATE_POST",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::PostNotFound => "POST_NOT_FOUND",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::PostCreationFailed => "POST_CREATION_FAILED",
            ErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Entity families the mutation core writes
///
/// Parameterizes the translator so duplicate / not-found codes and messages
/// come out entity-appropriate from a single mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Post,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Post => "Post",
        }
    }

    pub fn duplicate_code(&self) -> ErrorCode {
        match self {
            EntityKind::User => ErrorCode::DuplicateUser,
            EntityKind::Post => ErrorCode::DuplicatePost,
        }
    }

    pub fn not_found_code(&self) -> ErrorCode {
        match self {
            EntityKind::User => ErrorCode::UserNotFound,
            EntityKind::Post => ErrorCode::PostNotFound,
        }
    }

    /// Message used when the store's own uniqueness constraint rejects a write
    pub fn duplicate_message(&self) -> &'static str {
        match self {
            EntityKind::User => "User with this email or username already exists",
            EntityKind::Post => "Post with this id already exists",
        }
    }
}

/// Classified error handed back to callers
///
/// Carries a stable `code`, a short caller-safe `message`, and the original
/// underlying text as `cause` for diagnostics. Context fields are optional.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedError {
    code: ErrorCode,
    op: Option<String>,
    entity_id: Option<String>,
    field: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    cause: Option<String>,
}

impl ClassifiedError {
    /// Create a new error with the specified code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            op: None,
            entity_id: None,
            field: None,
            request_id: None,
            message: String::new(),
            cause: None,
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

    /// Name the payload field the error is about (e.g. the colliding unique field)
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add caller-facing message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Preserve the underlying error text
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the stable error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }
}

impl std::fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code_str())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ClassifiedError {}

// ========== End Error Facility ==========

/// Unclassified failure raised inside an operation
///
/// Internal steps return `Result<T, RawError>` and let `?` lift store and
/// validation failures; the operation boundary runs the translator once.
#[derive(Error, Debug, Clone)]
pub enum RawError {
    /// Payload rejected by a validator
    #[error("validation failed: {0}")]
    Validation(ValidationReport),

    /// Failure reported by the store client
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Error already classified by an inner step; passes through untouched
    #[error(transparent)]
    Classified(#[from] ClassifiedError),

    /// Anything else (e.g. a stored record that no longer decodes)
    #[error("{0}")]
    Internal(String),
}

impl From<ValidationReport> for RawError {
    fn from(report: ValidationReport) -> Self {
        RawError::Validation(report)
    }
}

impl From<serde_json::Error> for RawError {
    fn from(err: serde_json::Error) -> Self {
        RawError::Internal(format!("Malformed record: {}", err))
    }
}
