//! Accounts: participants of the marketplace.
//!
//! One document per participant. The role is a closed tagged enum carrying the
//! role-specific profile; it is immutable after creation. Capability accessors
//! return `PrivilegeViolation` for the wrong variant so the engine never
//! branches on role strings.

pub mod account;

pub use account::{
    Account, BusinessProfile, BusinessStatus, JobSeekerProfile, RecruiterProfile, Role, RoleData,
};
