use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use jobgrid_core::{AccountId, DomainError, DomainResult, Entity, JobId};
use jobgrid_store::Document;

/// Job approval lifecycle.
///
/// `pending_business ⇄ approved ⇄ rejected_business`; `approved |
/// pending_business → revoked` (business revocation cascade); `revoked →
/// pending_business` (business re-approval cascade). A revoked job is never
/// resurrected straight to `approved`: an approval attempt on it is redirected
/// to `pending_business` for a fresh review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    PendingBusiness,
    Approved,
    RejectedBusiness,
    Revoked,
}

impl JobStatus {
    /// States swept into `revoked` when the owning business is revoked.
    pub fn is_revokable(self) -> bool {
        matches!(self, JobStatus::Approved | JobStatus::PendingBusiness)
    }
}

/// One stage of the job's interview pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundDefinition {
    pub title: String,
    pub round_type: RoundType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    Screening,
    Technical,
    Assignment,
    Behavioral,
    Final,
}

/// Posting content. Opaque to the lifecycle engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct JobDetails {
    pub title: String,
    pub description: String,
    pub location: String,
    pub employment_type: Option<String>,
    pub salary_range: Option<String>,
}

/// Job document. Recruiter and business references are immutable once
/// created; only `status`, `approved_at` and `open` change over its lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    recruiter_id: AccountId,
    business_id: AccountId,
    details: JobDetails,
    rounds: Vec<RoundDefinition>,
    open: bool,
    status: JobStatus,
    approved_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl Job {
    /// A freshly submitted job: `pending_business`, open for applications
    /// once approved.
    pub fn submit(
        id: JobId,
        recruiter_id: AccountId,
        business_id: AccountId,
        details: JobDetails,
        rounds: Vec<RoundDefinition>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            recruiter_id,
            business_id,
            details,
            rounds,
            open: true,
            status: JobStatus::PendingBusiness,
            approved_at: None,
            created_at,
        }
    }

    pub fn job_id(&self) -> JobId {
        self.id
    }

    pub fn recruiter_id(&self) -> AccountId {
        self.recruiter_id
    }

    pub fn business_id(&self) -> AccountId {
        self.business_id
    }

    pub fn details(&self) -> &JobDetails {
        &self.details
    }

    pub fn rounds(&self) -> &[RoundDefinition] {
        &self.rounds
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn approved_at(&self) -> Option<DateTime<Utc>> {
        self.approved_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Visible to applicants: approved and open.
    pub fn accepting_applications(&self) -> bool {
        self.status == JobStatus::Approved && self.open
    }

    /// Business-side approval. Returns the status the job actually landed in:
    /// a revoked job is redirected to `pending_business` (with `approved_at`
    /// cleared) instead of being silently resurrected.
    pub fn approve(&mut self, now: DateTime<Utc>) -> DomainResult<JobStatus> {
        match self.status {
            JobStatus::PendingBusiness | JobStatus::RejectedBusiness => {
                self.status = JobStatus::Approved;
                self.approved_at = Some(now);
                Ok(JobStatus::Approved)
            }
            JobStatus::Revoked => {
                self.status = JobStatus::PendingBusiness;
                self.approved_at = None;
                Ok(JobStatus::PendingBusiness)
            }
            JobStatus::Approved => Err(DomainError::invalid_transition(
                "job is already approved",
            )),
        }
    }

    /// Business-side rejection.
    pub fn reject(&mut self) -> DomainResult<()> {
        match self.status {
            JobStatus::PendingBusiness | JobStatus::Approved => {
                self.status = JobStatus::RejectedBusiness;
                self.approved_at = None;
                Ok(())
            }
            _ => Err(DomainError::invalid_transition(format!(
                "job cannot be rejected from {:?}",
                self.status
            ))),
        }
    }

    /// Pause under a business revocation (`approved | pending_business →
    /// revoked`).
    pub fn revoke(&mut self) -> DomainResult<()> {
        if !self.status.is_revokable() {
            return Err(DomainError::invalid_transition(format!(
                "job cannot be revoked from {:?}",
                self.status
            )));
        }
        self.status = JobStatus::Revoked;
        self.approved_at = None;
        Ok(())
    }

    /// Re-enter the approval queue after business re-approval (`revoked →
    /// pending_business`, never straight to `approved`).
    pub fn restore(&mut self) -> DomainResult<()> {
        if self.status != JobStatus::Revoked {
            return Err(DomainError::invalid_transition(format!(
                "job cannot be restored from {:?}",
                self.status
            )));
        }
        self.status = JobStatus::PendingBusiness;
        self.approved_at = None;
        Ok(())
    }

    /// Stop accepting applications (owner-controlled, orthogonal to status).
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn reopen(&mut self) {
        self.open = true;
    }
}

impl Entity for Job {
    type Id = JobId;

    fn id(&self) -> &JobId {
        &self.id
    }
}

impl Document for Job {
    type Id = JobId;

    fn id(&self) -> JobId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_job() -> Job {
        Job::submit(
            JobId::new(),
            AccountId::new(),
            AccountId::new(),
            JobDetails {
                title: "Backend Engineer".to_string(),
                description: "Rust services".to_string(),
                location: "Remote".to_string(),
                ..JobDetails::default()
            },
            vec![
                RoundDefinition {
                    title: "Phone screen".to_string(),
                    round_type: RoundType::Screening,
                },
                RoundDefinition {
                    title: "Systems interview".to_string(),
                    round_type: RoundType::Technical,
                },
            ],
            Utc::now(),
        )
    }

    #[test]
    fn approve_stamps_approved_at() {
        let mut job = fresh_job();
        let now = Utc::now();
        assert_eq!(job.approve(now).unwrap(), JobStatus::Approved);
        assert_eq!(job.approved_at(), Some(now));
        assert!(job.accepting_applications());
    }

    #[test]
    fn reject_and_revoke_clear_approved_at() {
        let mut job = fresh_job();
        job.approve(Utc::now()).unwrap();
        job.reject().unwrap();
        assert_eq!(job.status(), JobStatus::RejectedBusiness);
        assert!(job.approved_at().is_none());

        // Rejected jobs can come back through approval.
        job.approve(Utc::now()).unwrap();
        job.revoke().unwrap();
        assert_eq!(job.status(), JobStatus::Revoked);
        assert!(job.approved_at().is_none());
    }

    #[test]
    fn approving_a_revoked_job_redirects_to_pending() {
        let mut job = fresh_job();
        job.approve(Utc::now()).unwrap();
        job.revoke().unwrap();

        // No silent resurrection: lands back in the approval queue.
        assert_eq!(job.approve(Utc::now()).unwrap(), JobStatus::PendingBusiness);
        assert_eq!(job.status(), JobStatus::PendingBusiness);
        assert!(job.approved_at().is_none());
    }

    #[test]
    fn pending_jobs_are_swept_by_revocation_too() {
        let mut job = fresh_job();
        assert_eq!(job.status(), JobStatus::PendingBusiness);
        job.revoke().unwrap();
        assert_eq!(job.status(), JobStatus::Revoked);
    }

    #[test]
    fn restore_requires_revoked() {
        let mut job = fresh_job();
        assert!(matches!(
            job.restore().unwrap_err(),
            DomainError::InvalidTransition(_)
        ));
        job.revoke().unwrap();
        job.restore().unwrap();
        assert_eq!(job.status(), JobStatus::PendingBusiness);
    }

    #[test]
    fn closed_job_does_not_accept_applications() {
        let mut job = fresh_job();
        job.approve(Utc::now()).unwrap();
        job.close();
        assert!(!job.accepting_applications());
        job.reopen();
        assert!(job.accepting_applications());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone, Copy)]
        enum Op {
            Approve,
            Reject,
            Revoke,
            Restore,
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                Just(Op::Approve),
                Just(Op::Reject),
                Just(Op::Revoke),
                Just(Op::Restore),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: after any sequence of transitions (legal or refused),
            /// `status == approved` holds exactly when `approved_at` is set.
            #[test]
            fn approved_at_iff_approved(ops in proptest::collection::vec(op_strategy(), 0..32)) {
                let mut job = fresh_job();
                for op in ops {
                    // Refused transitions leave state untouched.
                    let _ = match op {
                        Op::Approve => job.approve(Utc::now()).map(|_| ()),
                        Op::Reject => job.reject(),
                        Op::Revoke => job.revoke(),
                        Op::Restore => job.restore(),
                    };
                    prop_assert_eq!(
                        job.status() == JobStatus::Approved,
                        job.approved_at().is_some()
                    );
                }
            }
        }
    }
}
