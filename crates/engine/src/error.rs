//! Engine-level error taxonomy (what callers of the managers see).

use thiserror::Error;

use jobgrid_core::DomainError;
use jobgrid_store::StoreError;

pub type EngineResult<T> = Result<T, EngineError>;

/// Tagged failure surfaced to the caller of a manager operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A referenced entity is absent. No state change happened.
    #[error("not found")]
    NotFound,

    /// The operation is not legal from the entity's current state.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// Duplicate or racing state, with a machine-readable code.
    #[error("conflict ({code}): {message}")]
    Conflict {
        code: &'static str,
        message: String,
    },

    /// Wrong role attempted the operation. Carries no detail: callers must
    /// not learn whether the target exists.
    #[error("privilege violation")]
    PrivilegeViolation,

    /// Input failed validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A multi-entity cascade failed after some dependent writes succeeded.
    ///
    /// The authoritative status flag was *not* written (it always goes last),
    /// so re-running the operation is safe and converges: every cascade step
    /// filters on the states it transitions out of.
    #[error("cascade aborted at step `{step}`: {source}")]
    PartialCascade {
        step: &'static str,
        source: StoreError,
    },

    /// The entity store itself failed outside a cascade.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<DomainError> for EngineError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => EngineError::Validation(msg),
            DomainError::InvalidTransition(msg) => EngineError::InvalidTransition(msg),
            DomainError::Conflict { code, message } => EngineError::Conflict { code, message },
            DomainError::PrivilegeViolation => EngineError::PrivilegeViolation,
            DomainError::NotFound => EngineError::NotFound,
            DomainError::InvalidId(msg) => EngineError::Validation(msg),
        }
    }
}

impl EngineError {
    pub(crate) fn stale(message: impl Into<String>) -> Self {
        EngineError::Conflict {
            code: jobgrid_core::codes::STALE_STATUS,
            message: message.into(),
        }
    }
}

/// Wrap a cascade step so a store failure reports *where* the cascade stopped.
pub(crate) fn cascade_step<T>(
    step: &'static str,
    result: Result<T, StoreError>,
) -> EngineResult<T> {
    result.map_err(|source| EngineError::PartialCascade { step, source })
}
