//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined
//! entirely by their attribute values. Two value objects with the same values are
//! considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. The canonical case
/// in this engine is the applicant snapshot captured when an application is
/// submitted: it is a frozen copy of profile fields at a point in time, never
/// re-derived from the live account, so historical applications stay accurate
/// even after the source profile changes.
///
/// The trait requires:
/// - **Clone**: value objects are values, copying them is fine
/// - **PartialEq**: compared by their attribute values
/// - **Debug**: debuggable (logging, testing)
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct ApplicantSnapshot { name: String, email: String }
///
/// impl ValueObject for ApplicantSnapshot {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
