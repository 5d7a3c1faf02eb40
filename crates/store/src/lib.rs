//! `jobgrid-store` — Entity Store contract and in-memory implementation.
//!
//! The engine assumes an underlying document store with **per-document atomic
//! updates and no multi-document transactions**. This crate pins that
//! assumption down as a trait: every call touches at most one document
//! atomically (bulk updates are per-document atomic, not atomic as a unit),
//! and conditional updates (filter on id + expected status) are the only
//! race-safety primitive offered to callers.

pub mod collection;
pub mod error;
pub mod in_memory;

pub use collection::{Collection, Document, Filter, Patch};
pub use error::{StoreError, StoreResult};
pub use in_memory::InMemoryCollection;
