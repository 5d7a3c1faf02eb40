//! Notification payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use jobgrid_core::{AccountId, ApplicationId, JobId, LinkId};

/// What happened, carrying the event-specific payload.
///
/// One variant per notifiable transition. The first-approval /
/// re-approval split is deliberate: a business that was previously
/// revoked gets a different message (including how many of its jobs
/// re-entered the approval queue).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationKind {
    BusinessApproved,
    BusinessReapproved { jobs_restored: u64 },
    BusinessRejected { reason: Option<String> },
    BusinessRevoked,
    RecruiterJobsPaused { jobs_paused: u64 },

    LinkRequested { link_id: LinkId, recruiter_id: AccountId },
    LinkApproved { link_id: LinkId, business_id: AccountId },
    LinkRejected { link_id: LinkId, reason: Option<String> },
    RecruiterUnlinked { recruiter_id: AccountId },
    RecruiterRemoved { business_id: AccountId },

    JobSubmitted { job_id: JobId },
    JobApproved { job_id: JobId },
    JobRejected { job_id: JobId, reason: Option<String> },

    ApplicationReceived { application_id: ApplicationId, job_id: JobId },
    ApplicationShortlisted { application_id: ApplicationId, job_id: JobId },
    RoundScheduled { application_id: ApplicationId, round: u32 },
    ApplicationRejected { application_id: ApplicationId, reason: Option<String> },
    ApplicationHired { application_id: ApplicationId },
    ApplicationWithdrawn { application_id: ApplicationId, job_id: JobId },
}

impl NotificationKind {
    /// Stable template identifier (selects the message template downstream).
    pub fn template(&self) -> &'static str {
        match self {
            NotificationKind::BusinessApproved => "business.approved",
            NotificationKind::BusinessReapproved { .. } => "business.reapproved",
            NotificationKind::BusinessRejected { .. } => "business.rejected",
            NotificationKind::BusinessRevoked => "business.revoked",
            NotificationKind::RecruiterJobsPaused { .. } => "recruiter.jobs_paused",
            NotificationKind::LinkRequested { .. } => "link.requested",
            NotificationKind::LinkApproved { .. } => "link.approved",
            NotificationKind::LinkRejected { .. } => "link.rejected",
            NotificationKind::RecruiterUnlinked { .. } => "link.unlinked",
            NotificationKind::RecruiterRemoved { .. } => "link.removed_by_business",
            NotificationKind::JobSubmitted { .. } => "job.submitted",
            NotificationKind::JobApproved { .. } => "job.approved",
            NotificationKind::JobRejected { .. } => "job.rejected",
            NotificationKind::ApplicationReceived { .. } => "application.received",
            NotificationKind::ApplicationShortlisted { .. } => "application.shortlisted",
            NotificationKind::RoundScheduled { .. } => "application.round_scheduled",
            NotificationKind::ApplicationRejected { .. } => "application.rejected",
            NotificationKind::ApplicationHired { .. } => "application.hired",
            NotificationKind::ApplicationWithdrawn { .. } => "application.withdrawn",
        }
    }
}

/// A single outbound notification.
///
/// Immutable once built; treat it as a fact about a committed transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: AccountId,
    pub kind: NotificationKind,
    pub occurred_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(recipient: AccountId, kind: NotificationKind, occurred_at: DateTime<Utc>) -> Self {
        Self {
            recipient,
            kind,
            occurred_at,
        }
    }

    pub fn template(&self) -> &'static str {
        self.kind.template()
    }
}
