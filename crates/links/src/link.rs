use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use jobgrid_core::{AccountId, DomainError, DomainResult, Entity, LinkId};
use jobgrid_store::Document;

/// Link lifecycle.
///
/// `pending → approved | rejected`; `approved → unlinked`
/// (recruiter-initiated) or `approved → removed_by_business`
/// (business-initiated). The three right-hand states are terminal for the
/// *current* relationship but the record itself is reusable: a re-request
/// resets it to `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    Pending,
    Approved,
    Rejected,
    Unlinked,
    RemovedByBusiness,
}

impl LinkStatus {
    /// Active means the pair may not hold another link (`pending` or `approved`).
    pub fn is_active(self) -> bool {
        matches!(self, LinkStatus::Pending | LinkStatus::Approved)
    }

    pub fn is_terminal(self) -> bool {
        !self.is_active()
    }
}

/// Link document: durable relationship record between a recruiter and a
/// business, with timestamps per transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    id: LinkId,
    recruiter_id: AccountId,
    business_id: AccountId,
    status: LinkStatus,
    requested_at: DateTime<Utc>,
    approved_at: Option<DateTime<Utc>>,
    rejected_at: Option<DateTime<Utc>>,
    rejection_reason: Option<String>,
    unlinked_at: Option<DateTime<Utc>>,
    removed_at: Option<DateTime<Utc>>,
}

impl Link {
    /// A fresh request, starting at `pending`.
    pub fn request(
        id: LinkId,
        recruiter_id: AccountId,
        business_id: AccountId,
        requested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            recruiter_id,
            business_id,
            status: LinkStatus::Pending,
            requested_at,
            approved_at: None,
            rejected_at: None,
            rejection_reason: None,
            unlinked_at: None,
            removed_at: None,
        }
    }

    pub fn link_id(&self) -> LinkId {
        self.id
    }

    pub fn recruiter_id(&self) -> AccountId {
        self.recruiter_id
    }

    pub fn business_id(&self) -> AccountId {
        self.business_id
    }

    pub fn status(&self) -> LinkStatus {
        self.status
    }

    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    pub fn approved_at(&self) -> Option<DateTime<Utc>> {
        self.approved_at
    }

    pub fn rejected_at(&self) -> Option<DateTime<Utc>> {
        self.rejected_at
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    pub fn unlinked_at(&self) -> Option<DateTime<Utc>> {
        self.unlinked_at
    }

    pub fn removed_at(&self) -> Option<DateTime<Utc>> {
        self.removed_at
    }

    pub fn is_pair(&self, recruiter_id: AccountId, business_id: AccountId) -> bool {
        self.recruiter_id == recruiter_id && self.business_id == business_id
    }

    /// `pending → approved`.
    pub fn approve(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != LinkStatus::Pending {
            return Err(DomainError::invalid_transition(format!(
                "link cannot be approved from {:?}",
                self.status
            )));
        }
        self.status = LinkStatus::Approved;
        self.approved_at = Some(now);
        Ok(())
    }

    /// `pending → rejected`.
    pub fn reject(&mut self, reason: Option<String>, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != LinkStatus::Pending {
            return Err(DomainError::invalid_transition(format!(
                "link cannot be rejected from {:?}",
                self.status
            )));
        }
        self.status = LinkStatus::Rejected;
        self.rejected_at = Some(now);
        self.rejection_reason = reason;
        Ok(())
    }

    /// `approved → unlinked` (recruiter walked away).
    pub fn unlink(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != LinkStatus::Approved {
            return Err(DomainError::invalid_transition(format!(
                "link cannot be unlinked from {:?}",
                self.status
            )));
        }
        self.status = LinkStatus::Unlinked;
        self.unlinked_at = Some(now);
        Ok(())
    }

    /// `approved → removed_by_business` (business disconnected the recruiter).
    pub fn remove_by_business(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != LinkStatus::Approved {
            return Err(DomainError::invalid_transition(format!(
                "link cannot be removed from {:?}",
                self.status
            )));
        }
        self.status = LinkStatus::RemovedByBusiness;
        self.removed_at = Some(now);
        Ok(())
    }

    /// Reuse a terminal record for a re-request: back to `pending` with every
    /// terminal timestamp cleared, preserving the record's identity so the
    /// pair keeps a single historical row.
    pub fn reset_to_pending(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status.is_active() {
            return Err(DomainError::invalid_transition(format!(
                "only a terminal link can be re-requested, current status {:?}",
                self.status
            )));
        }
        self.status = LinkStatus::Pending;
        self.requested_at = now;
        self.approved_at = None;
        self.rejected_at = None;
        self.rejection_reason = None;
        self.unlinked_at = None;
        self.removed_at = None;
        Ok(())
    }
}

impl Entity for Link {
    type Id = LinkId;

    fn id(&self) -> &LinkId {
        &self.id
    }
}

impl Document for Link {
    type Id = LinkId;

    fn id(&self) -> LinkId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_link() -> Link {
        Link::request(LinkId::new(), AccountId::new(), AccountId::new(), Utc::now())
    }

    #[test]
    fn approve_stamps_timestamp() {
        let mut link = fresh_link();
        let now = Utc::now();
        link.approve(now).unwrap();
        assert_eq!(link.status(), LinkStatus::Approved);
        assert_eq!(link.approved_at(), Some(now));
    }

    #[test]
    fn only_pending_links_can_be_approved_or_rejected() {
        let mut link = fresh_link();
        link.approve(Utc::now()).unwrap();

        assert!(matches!(
            link.approve(Utc::now()).unwrap_err(),
            DomainError::InvalidTransition(_)
        ));
        assert!(matches!(
            link.reject(None, Utc::now()).unwrap_err(),
            DomainError::InvalidTransition(_)
        ));
    }

    #[test]
    fn unlink_and_remove_require_approved() {
        let mut link = fresh_link();
        assert!(link.unlink(Utc::now()).is_err());
        assert!(link.remove_by_business(Utc::now()).is_err());

        link.approve(Utc::now()).unwrap();
        link.remove_by_business(Utc::now()).unwrap();
        assert_eq!(link.status(), LinkStatus::RemovedByBusiness);
        assert!(link.removed_at().is_some());
    }

    #[test]
    fn reset_reuses_the_record_and_clears_terminal_timestamps() {
        let mut link = fresh_link();
        let original_id = link.link_id();
        link.reject(Some("not hiring".to_string()), Utc::now())
            .unwrap();
        assert!(link.rejected_at().is_some());

        let later = Utc::now();
        link.reset_to_pending(later).unwrap();
        assert_eq!(link.link_id(), original_id);
        assert_eq!(link.status(), LinkStatus::Pending);
        assert_eq!(link.requested_at(), later);
        assert!(link.rejected_at().is_none());
        assert!(link.rejection_reason().is_none());
        assert!(link.approved_at().is_none());
        assert!(link.unlinked_at().is_none());
        assert!(link.removed_at().is_none());
    }

    #[test]
    fn active_links_cannot_be_reset() {
        let mut link = fresh_link();
        assert!(matches!(
            link.reset_to_pending(Utc::now()).unwrap_err(),
            DomainError::InvalidTransition(_)
        ));
    }
}
