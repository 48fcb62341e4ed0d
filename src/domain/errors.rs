//! Domain errors for the paintquest planner.
//!
//! Display strings are user-facing and stable; callers and tests match on
//! the exact text.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::EventType;

/// Domain-level errors that can occur in the planner.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No owner id is configured.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// No attempt with this id belongs to the owner.
    #[error("Attempt not found")]
    AttemptNotFound(Uuid),

    /// No task with this id belongs to the owner.
    #[error("Task not found")]
    TaskNotFound(Uuid),

    /// A task looked up as the subject of a quest.
    #[error("Quest not found")]
    QuestNotFound(Uuid),

    /// No visible template with this id.
    #[error("Template not found")]
    TemplateNotFound(Uuid),

    /// No arsenal item with this id belongs to the owner.
    #[error("Arsenal item not found")]
    ArsenalItemNotFound(Uuid),

    /// The attempt's history cannot be explained by the transition table.
    /// Carries the deriver's reasoning verbatim.
    #[error("{0}")]
    InvalidHistory(String),

    /// The event is not allowed from the attempt's current state.
    #[error("Action not allowed: {0}")]
    ActionNotAllowed(EventType),

    /// The owner already has an attempt in progress.
    #[error("Another attempt is already in progress")]
    AttemptAlreadyActive,

    /// Input failed validation.
    #[error("{0}")]
    ValidationFailed(String),

    /// A store call failed; `context` is the user-facing message and
    /// `source` keeps the underlying cause for logs.
    #[error("{context}")]
    StoreFailure {
        context: &'static str,
        #[source]
        source: Box<DomainError>,
    },

    /// Raw storage failure.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// A stored value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Coarse classification of a [`DomainError`], used for HTTP-style status
/// mapping and CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input.
    Validation,
    /// Transition rejected by the attempt state machine.
    StateViolation,
    /// No owner configured.
    Unauthenticated,
    /// Missing or not owned.
    NotFound,
    /// Clashes with existing state.
    Conflict,
    /// Store failure.
    Storage,
}

impl ErrorKind {
    /// HTTP-style status for this kind.
    pub const fn http_status(self) -> u16 {
        match self {
            Self::Validation | Self::StateViolation => 400,
            Self::Unauthenticated => 401,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Storage => 500,
        }
    }

    /// Process exit code for this kind.
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Validation | Self::StateViolation => 2,
            Self::Unauthenticated => 3,
            Self::NotFound => 4,
            Self::Conflict => 5,
            Self::Storage => 1,
        }
    }
}

impl DomainError {
    /// Wrap a store error with a stable user-facing message.
    pub fn store(context: &'static str, source: Self) -> Self {
        // Domain failures raised by the store keep their own message.
        match source {
            Self::DatabaseError(_) | Self::SerializationError(_) => Self::StoreFailure {
                context,
                source: Box::new(source),
            },
            other => other,
        }
    }

    /// Shorthand for [`DomainError::ValidationFailed`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed(message.into())
    }

    /// Classify the error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAuthenticated => ErrorKind::Unauthenticated,
            Self::AttemptNotFound(_)
            | Self::TaskNotFound(_)
            | Self::QuestNotFound(_)
            | Self::TemplateNotFound(_)
            | Self::ArsenalItemNotFound(_) => ErrorKind::NotFound,
            Self::InvalidHistory(_) | Self::ActionNotAllowed(_) => ErrorKind::StateViolation,
            Self::AttemptAlreadyActive => ErrorKind::Conflict,
            Self::ValidationFailed(_) => ErrorKind::Validation,
            Self::StoreFailure { .. } | Self::DatabaseError(_) | Self::SerializationError(_) => {
                ErrorKind::Storage
            }
        }
    }
}

/// Result alias used throughout the domain and services.
pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        Self::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
