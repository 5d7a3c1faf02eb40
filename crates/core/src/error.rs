//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Machine-readable conflict codes surfaced to callers.
pub mod codes {
    pub const DUPLICATE_APPLICATION: &str = "duplicate_application";
    pub const DUPLICATE_PENDING_LINK: &str = "duplicate_pending_link";
    pub const RECRUITER_ALREADY_LINKED: &str = "recruiter_already_linked";
    /// Conditional status write lost a race (document no longer in the
    /// expected state).
    pub const STALE_STATUS: &str = "stale_status";
}

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// transition guards, conflicts). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed or missing input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The operation is not legal from the entity's current state.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// A conflict with existing state, carrying a machine-readable code.
    #[error("conflict ({code}): {message}")]
    Conflict {
        code: &'static str,
        message: String,
    },

    /// Wrong role attempted an operation. Deliberately carries no detail:
    /// callers must not learn whether the target exists.
    #[error("privilege violation")]
    PrivilegeViolation,

    /// A referenced entity is absent (domain-level).
    #[error("not found")]
    NotFound,

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidTransition(msg.into())
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
