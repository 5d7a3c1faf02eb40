//! Application pipeline: submission, review, rounds, terminal outcomes.

use chrono::Utc;
use tracing::info;

use jobgrid_applications::{
    ApplicantSnapshot, Application, ApplicationStatus, RoundResult,
};
use jobgrid_core::{codes, AccountId, ApplicationId, JobId};
use jobgrid_notify::{dispatch, Notification, NotificationKind};

use crate::error::{EngineError, EngineResult};
use crate::{AccountStore, ApplicationStore, JobStore, Notifier};

/// Where an application landed after a round update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    pub application_id: ApplicationId,
    pub round: u32,
    pub status: ApplicationStatus,
}

/// Owns per-application status and round progression. Reads Job round
/// definitions but never mutates jobs.
pub struct ApplicationPipeline {
    accounts: AccountStore,
    jobs: JobStore,
    applications: ApplicationStore,
    notifier: Notifier,
}

impl ApplicationPipeline {
    pub fn new(
        accounts: AccountStore,
        jobs: JobStore,
        applications: ApplicationStore,
        notifier: Notifier,
    ) -> Self {
        Self {
            accounts,
            jobs,
            applications,
            notifier,
        }
    }

    /// Jobseeker applies to an open, approved job.
    ///
    /// Captures the applicant snapshot at submission time; it is never
    /// re-synced from the live profile.
    pub fn submit(
        &self,
        job_id: JobId,
        applicant_id: AccountId,
        skills: Vec<String>,
        cover_letter: Option<String>,
    ) -> EngineResult<ApplicationId> {
        let now = Utc::now();
        let job = self.jobs.find_by_id(&job_id)?.ok_or(EngineError::NotFound)?;
        if !job.accepting_applications() {
            return Err(EngineError::InvalidTransition(
                "job is not accepting applications".to_string(),
            ));
        }

        let account = self
            .accounts
            .find_by_id(&applicant_id)?
            .ok_or(EngineError::NotFound)?;
        let profile = account.as_job_seeker()?;
        let resume = profile.resume.clone().ok_or_else(|| {
            EngineError::Validation("a resume is required to apply".to_string())
        })?;

        // One application per (job, jobseeker), ever — withdrawn included.
        let duplicate = self
            .applications
            .find_one(&|a: &Application| {
                a.job_id() == job_id && a.applicant_id() == applicant_id
            })?
            .is_some();
        if duplicate {
            return Err(EngineError::Conflict {
                code: codes::DUPLICATE_APPLICATION,
                message: "an application for this job already exists".to_string(),
            });
        }

        let snapshot = ApplicantSnapshot {
            full_name: profile.full_name.clone(),
            email: account.email().to_string(),
            headline: profile.headline.clone(),
            resume,
        };
        let application = Application::submit(
            ApplicationId::new(),
            job_id,
            applicant_id,
            snapshot,
            skills,
            cover_letter,
            now,
        );
        let application_id = application.application_id();
        self.applications.create(application)?;

        dispatch(
            self.notifier.as_ref(),
            Notification::new(
                job.recruiter_id(),
                NotificationKind::ApplicationReceived {
                    application_id,
                    job_id,
                },
                now,
            ),
        );
        info!(%application_id, %job_id, %applicant_id, "application submitted");
        Ok(application_id)
    }

    /// Recruiter opens the application: `applied → under_review` on first
    /// view, no-op afterwards. Returns whether the transition happened.
    pub fn view(&self, application_id: ApplicationId) -> EngineResult<bool> {
        let application = self
            .applications
            .find_by_id(&application_id)?
            .ok_or(EngineError::NotFound)?;
        let first_view = application.status() == ApplicationStatus::Applied;
        if first_view {
            self.applications.update_by_id(&application_id, &|a| {
                a.mark_under_review();
            })?;
            info!(%application_id, "application under review");
        }
        Ok(first_view)
    }

    /// Move an application into the interview pipeline.
    pub fn shortlist(
        &self,
        application_id: ApplicationId,
        note: Option<String>,
    ) -> EngineResult<()> {
        let now = Utc::now();
        let application = self
            .applications
            .find_by_id(&application_id)?
            .ok_or(EngineError::NotFound)?;
        let job = self
            .jobs
            .find_by_id(&application.job_id())?
            .ok_or(EngineError::NotFound)?;
        let total_rounds = job.rounds().len();

        let mut copy = application.clone();
        copy.shortlist(note.clone(), total_rounds, now)?;
        let read_status = application.status();

        self.applications
            .update_one(
                &|a: &Application| {
                    a.application_id() == application_id && a.status() == read_status
                },
                &|a| {
                    let _ = a.shortlist(note.clone(), total_rounds, now);
                },
            )?
            .ok_or_else(|| EngineError::stale("application status changed concurrently"))?;

        dispatch(
            self.notifier.as_ref(),
            Notification::new(
                application.applicant_id(),
                NotificationKind::ApplicationShortlisted {
                    application_id,
                    job_id: application.job_id(),
                },
                now,
            ),
        );
        info!(%application_id, "application shortlisted");
        Ok(())
    }

    /// Record an interview round outcome; see the domain machine for the
    /// failed/passed/advance semantics.
    pub fn update_round(
        &self,
        application_id: ApplicationId,
        round_number: u32,
        result: RoundResult,
        note: Option<String>,
        advance_to_next: bool,
    ) -> EngineResult<RoundOutcome> {
        let now = Utc::now();
        let application = self
            .applications
            .find_by_id(&application_id)?
            .ok_or(EngineError::NotFound)?;
        let job = self
            .jobs
            .find_by_id(&application.job_id())?
            .ok_or(EngineError::NotFound)?;
        let total_rounds = job.rounds().len();

        let mut copy = application.clone();
        let landed = copy.update_round(
            round_number,
            result,
            note.clone(),
            advance_to_next,
            total_rounds,
            now,
        )?;
        let read_status = application.status();

        self.applications
            .update_one(
                &|a: &Application| {
                    a.application_id() == application_id && a.status() == read_status
                },
                &|a| {
                    let _ = a.update_round(
                        round_number,
                        result,
                        note.clone(),
                        advance_to_next,
                        total_rounds,
                        now,
                    );
                },
            )?
            .ok_or_else(|| EngineError::stale("application status changed concurrently"))?;

        let applicant_id = application.applicant_id();
        match landed {
            ApplicationStatus::Rejected => dispatch(
                self.notifier.as_ref(),
                Notification::new(
                    applicant_id,
                    NotificationKind::ApplicationRejected {
                        application_id,
                        reason: copy.rejection_reason().map(str::to_string),
                    },
                    now,
                ),
            ),
            ApplicationStatus::Hired => dispatch(
                self.notifier.as_ref(),
                Notification::new(
                    applicant_id,
                    NotificationKind::ApplicationHired { application_id },
                    now,
                ),
            ),
            _ => {
                if let Some(round) = copy.current_round() {
                    if advance_to_next && result == RoundResult::Passed {
                        dispatch(
                            self.notifier.as_ref(),
                            Notification::new(
                                applicant_id,
                                NotificationKind::RoundScheduled {
                                    application_id,
                                    round,
                                },
                                now,
                            ),
                        );
                    }
                }
            }
        }
        info!(%application_id, round_number, ?landed, "round update recorded");

        Ok(RoundOutcome {
            application_id,
            round: round_number,
            status: landed,
        })
    }

    /// Recruiter rejects outright. Guarded against absorbing states.
    pub fn reject(
        &self,
        application_id: ApplicationId,
        reason: Option<String>,
    ) -> EngineResult<()> {
        let now = Utc::now();
        let application = self
            .applications
            .find_by_id(&application_id)?
            .ok_or(EngineError::NotFound)?;

        let mut copy = application.clone();
        copy.reject(reason.clone(), now)?;
        let read_status = application.status();

        self.applications
            .update_one(
                &|a: &Application| {
                    a.application_id() == application_id && a.status() == read_status
                },
                &|a| {
                    let _ = a.reject(reason.clone(), now);
                },
            )?
            .ok_or_else(|| EngineError::stale("application status changed concurrently"))?;

        dispatch(
            self.notifier.as_ref(),
            Notification::new(
                application.applicant_id(),
                NotificationKind::ApplicationRejected {
                    application_id,
                    reason: copy.rejection_reason().map(str::to_string),
                },
                now,
            ),
        );
        info!(%application_id, "application rejected");
        Ok(())
    }

    /// Jobseeker withdraws their own application.
    pub fn withdraw(
        &self,
        application_id: ApplicationId,
        applicant_id: AccountId,
    ) -> EngineResult<()> {
        let now = Utc::now();
        let application = self
            .applications
            .find_by_id(&application_id)?
            .ok_or(EngineError::NotFound)?;
        if application.applicant_id() != applicant_id {
            return Err(EngineError::PrivilegeViolation);
        }

        let mut copy = application.clone();
        copy.withdraw(now)?;
        let read_status = application.status();

        self.applications
            .update_one(
                &|a: &Application| {
                    a.application_id() == application_id && a.status() == read_status
                },
                &|a| {
                    let _ = a.withdraw(now);
                },
            )?
            .ok_or_else(|| EngineError::stale("application status changed concurrently"))?;

        let job_id = application.job_id();
        if let Some(job) = self.jobs.find_by_id(&job_id)? {
            dispatch(
                self.notifier.as_ref(),
                Notification::new(
                    job.recruiter_id(),
                    NotificationKind::ApplicationWithdrawn {
                        application_id,
                        job_id,
                    },
                    now,
                ),
            );
        }
        info!(%application_id, "application withdrawn");
        Ok(())
    }
}
