use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use jobgrid_core::{AccountId, DomainError, DomainResult, Entity};
use jobgrid_store::Document;

/// Participant role (immutable after creation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Jobseeker,
    Recruiter,
    Business,
    Admin,
}

/// Business approval lifecycle.
///
/// `pending → approved | rejected`; `approved → pending` on revocation (the
/// business re-enters the approval queue, it is not marked rejected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessStatus {
    Pending,
    Approved,
    Rejected,
}

/// Job-seeker profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct JobSeekerProfile {
    pub full_name: String,
    pub headline: Option<String>,
    pub skills: Vec<String>,
    /// Reference into external resume storage (opaque to the engine).
    pub resume: Option<String>,
}

/// Recruiter profile. At most one active business link at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RecruiterProfile {
    pub full_name: String,
    linked_business: Option<AccountId>,
}

impl RecruiterProfile {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            linked_business: None,
        }
    }

    pub fn linked_business(&self) -> Option<AccountId> {
        self.linked_business
    }

    pub fn is_linked_to(&self, business_id: AccountId) -> bool {
        self.linked_business == Some(business_id)
    }

    /// Take the link slot. Guards the 0-or-1 link invariant.
    pub fn set_linked_business(&mut self, business_id: AccountId) -> DomainResult<()> {
        if let Some(current) = self.linked_business {
            return Err(DomainError::conflict(
                jobgrid_core::codes::RECRUITER_ALREADY_LINKED,
                format!("recruiter is already linked to business {current}"),
            ));
        }
        self.linked_business = Some(business_id);
        Ok(())
    }

    pub fn clear_linked_business(&mut self) {
        self.linked_business = None;
    }
}

/// Business profile with its approval sub-state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub name: String,
    pub website: Option<String>,
    status: BusinessStatus,
    verified: bool,
}

impl BusinessProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            website: None,
            status: BusinessStatus::Pending,
            verified: false,
        }
    }

    pub fn status(&self) -> BusinessStatus {
        self.status
    }

    pub fn verified(&self) -> bool {
        self.verified
    }

    pub fn is_approved(&self) -> bool {
        self.status == BusinessStatus::Approved
    }

    /// `pending → approved` (also the re-approval path after revocation,
    /// since revoke parks the business back at `pending`).
    pub fn approve(&mut self) -> DomainResult<()> {
        if self.status != BusinessStatus::Pending {
            return Err(DomainError::invalid_transition(format!(
                "business cannot be approved from {:?}",
                self.status
            )));
        }
        self.status = BusinessStatus::Approved;
        self.verified = true;
        Ok(())
    }

    /// `pending → rejected`.
    pub fn reject(&mut self) -> DomainResult<()> {
        if self.status != BusinessStatus::Pending {
            return Err(DomainError::invalid_transition(format!(
                "business cannot be rejected from {:?}",
                self.status
            )));
        }
        self.status = BusinessStatus::Rejected;
        self.verified = false;
        Ok(())
    }

    /// `approved → pending`: back to the approval queue, not `rejected`.
    pub fn revoke(&mut self) -> DomainResult<()> {
        if self.status != BusinessStatus::Approved {
            return Err(DomainError::invalid_transition(format!(
                "business cannot be revoked from {:?}",
                self.status
            )));
        }
        self.status = BusinessStatus::Pending;
        self.verified = false;
        Ok(())
    }
}

/// Role-specific data, tagged by role (the capability interface).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleData {
    Jobseeker(JobSeekerProfile),
    Recruiter(RecruiterProfile),
    Business(BusinessProfile),
    Admin,
}

impl RoleData {
    pub fn role(&self) -> Role {
        match self {
            RoleData::Jobseeker(_) => Role::Jobseeker,
            RoleData::Recruiter(_) => Role::Recruiter,
            RoleData::Business(_) => Role::Business,
            RoleData::Admin => Role::Admin,
        }
    }
}

/// Account document: one per participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    email: String,
    created_at: DateTime<Utc>,
    data: RoleData,
}

impl Account {
    pub fn new(
        id: AccountId,
        email: impl Into<String>,
        data: RoleData,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            created_at,
            data,
        }
    }

    pub fn job_seeker(
        id: AccountId,
        email: impl Into<String>,
        profile: JobSeekerProfile,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::new(id, email, RoleData::Jobseeker(profile), created_at)
    }

    pub fn recruiter(
        id: AccountId,
        email: impl Into<String>,
        profile: RecruiterProfile,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::new(id, email, RoleData::Recruiter(profile), created_at)
    }

    pub fn business(
        id: AccountId,
        email: impl Into<String>,
        profile: BusinessProfile,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::new(id, email, RoleData::Business(profile), created_at)
    }

    pub fn admin(id: AccountId, email: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self::new(id, email, RoleData::Admin, created_at)
    }

    pub fn account_id(&self) -> AccountId {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn role(&self) -> Role {
        self.data.role()
    }

    // Capability accessors. Wrong variant is a privilege violation, which by
    // design carries no detail about the target.

    pub fn as_job_seeker(&self) -> DomainResult<&JobSeekerProfile> {
        match &self.data {
            RoleData::Jobseeker(p) => Ok(p),
            _ => Err(DomainError::PrivilegeViolation),
        }
    }

    pub fn as_job_seeker_mut(&mut self) -> DomainResult<&mut JobSeekerProfile> {
        match &mut self.data {
            RoleData::Jobseeker(p) => Ok(p),
            _ => Err(DomainError::PrivilegeViolation),
        }
    }

    pub fn as_recruiter(&self) -> DomainResult<&RecruiterProfile> {
        match &self.data {
            RoleData::Recruiter(p) => Ok(p),
            _ => Err(DomainError::PrivilegeViolation),
        }
    }

    pub fn as_recruiter_mut(&mut self) -> DomainResult<&mut RecruiterProfile> {
        match &mut self.data {
            RoleData::Recruiter(p) => Ok(p),
            _ => Err(DomainError::PrivilegeViolation),
        }
    }

    pub fn as_business(&self) -> DomainResult<&BusinessProfile> {
        match &self.data {
            RoleData::Business(p) => Ok(p),
            _ => Err(DomainError::PrivilegeViolation),
        }
    }

    pub fn as_business_mut(&mut self) -> DomainResult<&mut BusinessProfile> {
        match &mut self.data {
            RoleData::Business(p) => Ok(p),
            _ => Err(DomainError::PrivilegeViolation),
        }
    }

    /// Non-failing view of the recruiter link slot (None for other roles).
    pub fn linked_business(&self) -> Option<AccountId> {
        match &self.data {
            RoleData::Recruiter(p) => p.linked_business(),
            _ => None,
        }
    }

    /// Non-failing view of the business status (None for other roles).
    pub fn business_status(&self) -> Option<BusinessStatus> {
        match &self.data {
            RoleData::Business(p) => Some(p.status()),
            _ => None,
        }
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &AccountId {
        &self.id
    }
}

impl Document for Account {
    type Id = AccountId;

    fn id(&self) -> AccountId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn business_account(profile: BusinessProfile) -> Account {
        Account::business(AccountId::new(), "biz@example.com", profile, Utc::now())
    }

    #[test]
    fn business_approval_sets_verified() {
        let mut profile = BusinessProfile::new("Acme");
        assert_eq!(profile.status(), BusinessStatus::Pending);
        assert!(!profile.verified());

        profile.approve().unwrap();
        assert_eq!(profile.status(), BusinessStatus::Approved);
        assert!(profile.verified());
    }

    #[test]
    fn revoke_returns_business_to_pending_not_rejected() {
        let mut profile = BusinessProfile::new("Acme");
        profile.approve().unwrap();
        profile.revoke().unwrap();
        assert_eq!(profile.status(), BusinessStatus::Pending);
        assert!(!profile.verified());

        // And the pending business can be approved again.
        profile.approve().unwrap();
        assert_eq!(profile.status(), BusinessStatus::Approved);
    }

    #[test]
    fn revoke_requires_approved_state() {
        let mut profile = BusinessProfile::new("Acme");
        let err = profile.revoke().unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));

        profile.reject().unwrap();
        let err = profile.revoke().unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
    }

    #[test]
    fn recruiter_link_slot_holds_at_most_one_business() {
        let mut profile = RecruiterProfile::new("Rae");
        let first = AccountId::new();
        let second = AccountId::new();

        profile.set_linked_business(first).unwrap();
        let err = profile.set_linked_business(second).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Conflict {
                code: jobgrid_core::codes::RECRUITER_ALREADY_LINKED,
                ..
            }
        ));

        profile.clear_linked_business();
        profile.set_linked_business(second).unwrap();
        assert!(profile.is_linked_to(second));
    }

    #[test]
    fn capability_accessor_rejects_wrong_role() {
        let account = business_account(BusinessProfile::new("Acme"));
        let err = account.as_recruiter().unwrap_err();
        assert_eq!(err, DomainError::PrivilegeViolation);
        assert!(account.as_business().is_ok());
        assert_eq!(account.role(), Role::Business);
    }
}
