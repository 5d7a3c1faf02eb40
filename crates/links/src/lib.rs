//! Recruiter↔Business link records.
//!
//! A `Link` is the full history of one (recruiter, business) relationship, not
//! just its current state: re-requests reuse the existing record instead of
//! inserting a duplicate, and `removed_by_business` survives as the durable
//! signal that a business once disconnected someone (the re-approval detector).

pub mod link;

pub use link::{Link, LinkStatus};
