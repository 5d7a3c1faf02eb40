//! Store-level errors (infrastructure, not domain).

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// `create` was called with an id that already exists.
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// The backing store failed (lock poisoning, IO, driver error).
    #[error("store backend failure: {0}")]
    Backend(String),
}
