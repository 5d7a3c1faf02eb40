//! Job lifecycle: submission and business-side review.

use chrono::Utc;
use tracing::info;

use jobgrid_core::{AccountId, JobId};
use jobgrid_jobs::{Job, JobDetails, JobStatus, RoundDefinition};
use jobgrid_notify::{dispatch, Notification, NotificationKind};

use crate::error::{EngineError, EngineResult};
use crate::{AccountStore, JobStore, Notifier};

/// Owns `status`/`approved_at` on jobs for operator-initiated transitions.
/// The bulk revoke/restore sweeps belong to the business cascade.
pub struct JobLifecycle {
    accounts: AccountStore,
    jobs: JobStore,
    notifier: Notifier,
}

impl JobLifecycle {
    pub fn new(accounts: AccountStore, jobs: JobStore, notifier: Notifier) -> Self {
        Self {
            accounts,
            jobs,
            notifier,
        }
    }

    /// Recruiter posts a job on behalf of their linked business.
    pub fn submit(
        &self,
        recruiter_id: AccountId,
        details: JobDetails,
        rounds: Vec<RoundDefinition>,
    ) -> EngineResult<JobId> {
        let now = Utc::now();
        let recruiter = self
            .accounts
            .find_by_id(&recruiter_id)?
            .ok_or(EngineError::NotFound)?;
        let business_id = recruiter
            .as_recruiter()?
            .linked_business()
            .ok_or_else(|| {
                EngineError::InvalidTransition(
                    "recruiter is not linked to a business".to_string(),
                )
            })?;
        let business = self
            .accounts
            .find_by_id(&business_id)?
            .ok_or(EngineError::NotFound)?;
        if !business.as_business()?.is_approved() {
            return Err(EngineError::InvalidTransition(
                "linked business is not approved".to_string(),
            ));
        }

        let job = Job::submit(JobId::new(), recruiter_id, business_id, details, rounds, now);
        let job_id = job.job_id();
        self.jobs.create(job)?;

        dispatch(
            self.notifier.as_ref(),
            Notification::new(business_id, NotificationKind::JobSubmitted { job_id }, now),
        );
        info!(%job_id, %recruiter_id, %business_id, "job submitted");
        Ok(job_id)
    }

    /// Business approves a job it owns. Returns the status the job landed
    /// in: a revoked job is redirected to `pending_business` for fresh
    /// review instead of being resurrected to `approved`.
    pub fn approve(&self, business_id: AccountId, job_id: JobId) -> EngineResult<JobStatus> {
        let now = Utc::now();
        let job = self.jobs.find_by_id(&job_id)?.ok_or(EngineError::NotFound)?;
        if job.business_id() != business_id {
            return Err(EngineError::PrivilegeViolation);
        }

        let mut copy = job.clone();
        let landed = copy.approve(now)?;
        let read_status = job.status();

        self.jobs
            .update_one(
                &|j: &Job| j.job_id() == job_id && j.status() == read_status,
                &|j| {
                    let _ = j.approve(now);
                },
            )?
            .ok_or_else(|| EngineError::stale("job status changed concurrently"))?;

        if landed == JobStatus::Approved {
            dispatch(
                self.notifier.as_ref(),
                Notification::new(
                    job.recruiter_id(),
                    NotificationKind::JobApproved { job_id },
                    now,
                ),
            );
        }
        info!(%job_id, ?landed, "job approval processed");
        Ok(landed)
    }

    /// Business rejects a job it owns.
    pub fn reject(
        &self,
        business_id: AccountId,
        job_id: JobId,
        reason: Option<String>,
    ) -> EngineResult<()> {
        let now = Utc::now();
        let job = self.jobs.find_by_id(&job_id)?.ok_or(EngineError::NotFound)?;
        if job.business_id() != business_id {
            return Err(EngineError::PrivilegeViolation);
        }

        let mut copy = job.clone();
        copy.reject()?;
        let read_status = job.status();

        self.jobs
            .update_one(
                &|j: &Job| j.job_id() == job_id && j.status() == read_status,
                &|j| {
                    let _ = j.reject();
                },
            )?
            .ok_or_else(|| EngineError::stale("job status changed concurrently"))?;

        dispatch(
            self.notifier.as_ref(),
            Notification::new(
                job.recruiter_id(),
                NotificationKind::JobRejected { job_id, reason },
                now,
            ),
        );
        info!(%job_id, "job rejected");
        Ok(())
    }

    /// Owning recruiter stops application intake. Idempotent.
    pub fn close(&self, recruiter_id: AccountId, job_id: JobId) -> EngineResult<()> {
        self.toggle_open(recruiter_id, job_id, false)
    }

    /// Owning recruiter resumes application intake. Idempotent.
    pub fn reopen(&self, recruiter_id: AccountId, job_id: JobId) -> EngineResult<()> {
        self.toggle_open(recruiter_id, job_id, true)
    }

    fn toggle_open(&self, recruiter_id: AccountId, job_id: JobId, open: bool) -> EngineResult<()> {
        let job = self.jobs.find_by_id(&job_id)?.ok_or(EngineError::NotFound)?;
        if job.recruiter_id() != recruiter_id {
            return Err(EngineError::PrivilegeViolation);
        }
        self.jobs.update_by_id(&job_id, &|j| {
            if open {
                j.reopen();
            } else {
                j.close();
            }
        })?;
        info!(%job_id, open, "job intake toggled");
        Ok(())
    }
}
