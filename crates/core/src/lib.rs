//! `jobgrid-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{codes, DomainError, DomainResult};
pub use id::{AccountId, ApplicationId, JobId, LinkId};
pub use value_object::ValueObject;
