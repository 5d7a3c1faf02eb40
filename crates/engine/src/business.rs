//! Business lifecycle: approval, rejection, revocation, and their cascades.

use std::collections::HashMap;

use chrono::Utc;
use tracing::info;

use jobgrid_accounts::{Account, BusinessStatus};
use jobgrid_core::AccountId;
use jobgrid_jobs::{Job, JobStatus};
use jobgrid_links::{Link, LinkStatus};
use jobgrid_notify::{dispatch, Notification, NotificationKind};

use crate::error::{cascade_step, EngineError, EngineResult};
use crate::{AccountStore, JobStore, LinkStore, Notifier};

/// Result of approving a business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessApproval {
    pub business_id: AccountId,
    /// Revoked jobs returned to the approval queue (`pending_business`).
    pub jobs_restored: u64,
    /// Whether this was a re-approval after a revocation (selects the
    /// notification variant).
    pub reapproval: bool,
}

/// Result of revoking a business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessRevocation {
    pub business_id: AccountId,
    pub jobs_revoked: u64,
    pub recruiters_unlinked: u64,
    pub links_removed: u64,
}

/// Owns `businessStatus`/`verified` and every cascade they trigger.
pub struct BusinessLifecycle {
    accounts: AccountStore,
    jobs: JobStore,
    links: LinkStore,
    notifier: Notifier,
}

impl BusinessLifecycle {
    pub fn new(accounts: AccountStore, jobs: JobStore, links: LinkStore, notifier: Notifier) -> Self {
        Self {
            accounts,
            jobs,
            links,
            notifier,
        }
    }

    /// Approve a pending business.
    ///
    /// A `removed_by_business` link is the durable trace of a previous
    /// revocation; its presence selects the re-approval notification and
    /// means this business may have revoked jobs to restore. Restoration
    /// happens *before* the authoritative status write: jobs re-enter the
    /// approval queue as `pending_business`, never straight to `approved`.
    pub fn approve(&self, business_id: AccountId) -> EngineResult<BusinessApproval> {
        let now = Utc::now();
        let account = self
            .accounts
            .find_by_id(&business_id)?
            .ok_or(EngineError::NotFound)?;
        let mut profile = account.as_business()?.clone();
        profile.approve()?;

        let reapproval = self
            .links
            .find_one(&|l: &Link| {
                l.business_id() == business_id && l.status() == LinkStatus::RemovedByBusiness
            })?
            .is_some();

        let jobs_restored = cascade_step(
            "restore_jobs",
            self.jobs.update_many(
                &|j: &Job| j.business_id() == business_id && j.status() == JobStatus::Revoked,
                &|j| {
                    // Filter pre-qualifies the status; the guard cannot fire.
                    let _ = j.restore();
                },
            ),
        )?;

        // Authoritative write last, conditional on the status we validated.
        self.accounts
            .update_one(
                &|a: &Account| {
                    a.account_id() == business_id
                        && a.business_status() == Some(BusinessStatus::Pending)
                },
                &|a| {
                    if let Ok(b) = a.as_business_mut() {
                        let _ = b.approve();
                    }
                },
            )?
            .ok_or_else(|| EngineError::stale("business is no longer pending"))?;

        let kind = if reapproval {
            NotificationKind::BusinessReapproved { jobs_restored }
        } else {
            NotificationKind::BusinessApproved
        };
        dispatch(
            self.notifier.as_ref(),
            Notification::new(business_id, kind, now),
        );
        info!(%business_id, jobs_restored, reapproval, "business approved");

        Ok(BusinessApproval {
            business_id,
            jobs_restored,
            reapproval,
        })
    }

    /// Reject a pending business. No cascade: a business that was never
    /// approved cannot have active links or visible jobs.
    pub fn reject(&self, business_id: AccountId, reason: Option<String>) -> EngineResult<()> {
        let now = Utc::now();
        let account = self
            .accounts
            .find_by_id(&business_id)?
            .ok_or(EngineError::NotFound)?;
        let mut profile = account.as_business()?.clone();
        profile.reject()?;

        self.accounts
            .update_one(
                &|a: &Account| {
                    a.account_id() == business_id
                        && a.business_status() == Some(BusinessStatus::Pending)
                },
                &|a| {
                    if let Ok(b) = a.as_business_mut() {
                        let _ = b.reject();
                    }
                },
            )?
            .ok_or_else(|| EngineError::stale("business is no longer pending"))?;

        dispatch(
            self.notifier.as_ref(),
            Notification::new(business_id, NotificationKind::BusinessRejected { reason }, now),
        );
        info!(%business_id, "business rejected");
        Ok(())
    }

    /// Revoke an approved business.
    ///
    /// Cascade order matters: dependent entities first, the business's own
    /// status flag last. If a step fails, the operation aborts with
    /// `PartialCascade` and the business stays `approved`; every step filters
    /// on the states it transitions out of, so a re-run picks up exactly the
    /// leftovers and converges.
    pub fn revoke(&self, business_id: AccountId) -> EngineResult<BusinessRevocation> {
        let now = Utc::now();
        let account = self
            .accounts
            .find_by_id(&business_id)?
            .ok_or(EngineError::NotFound)?;
        let mut profile = account.as_business()?.clone();
        profile.revoke()?;

        // (a) recruiters currently acting for this business
        let recruiters = cascade_step(
            "collect_recruiters",
            self.accounts
                .find_many(&|a: &Account| a.linked_business() == Some(business_id)),
        )?;

        // (b) pause this business's live jobs (approved *and* pending_business
        // — intentional breadth). Read first so each recruiter can be told
        // how many of theirs were paused.
        let paused_jobs = cascade_step(
            "collect_jobs",
            self.jobs
                .find_many(&|j: &Job| j.business_id() == business_id && j.status().is_revokable()),
        )?;
        let jobs_revoked = cascade_step(
            "revoke_jobs",
            self.jobs.update_many(
                &|j: &Job| j.business_id() == business_id && j.status().is_revokable(),
                &|j| {
                    let _ = j.revoke();
                },
            ),
        )?;

        // (c) detach the recruiters
        let recruiters_unlinked = cascade_step(
            "unlink_recruiters",
            self.accounts.update_many(
                &|a: &Account| a.linked_business() == Some(business_id),
                &|a| {
                    if let Ok(r) = a.as_recruiter_mut() {
                        r.clear_linked_business();
                    }
                },
            ),
        )?;

        // (d) mark the links removed_by_business — the re-approval detector
        let links_removed = cascade_step(
            "remove_links",
            self.links.update_many(
                &|l: &Link| l.business_id() == business_id && l.status() == LinkStatus::Approved,
                &|l| {
                    let _ = l.remove_by_business(now);
                },
            ),
        )?;

        // (e) authoritative write last
        self.accounts
            .update_one(
                &|a: &Account| {
                    a.account_id() == business_id
                        && a.business_status() == Some(BusinessStatus::Approved)
                },
                &|a| {
                    if let Ok(b) = a.as_business_mut() {
                        let _ = b.revoke();
                    }
                },
            )?
            .ok_or_else(|| EngineError::stale("business is no longer approved"))?;

        let mut paused_per_recruiter: HashMap<AccountId, u64> = HashMap::new();
        for job in &paused_jobs {
            *paused_per_recruiter.entry(job.recruiter_id()).or_default() += 1;
        }
        for recruiter in &recruiters {
            let jobs_paused = paused_per_recruiter
                .get(&recruiter.account_id())
                .copied()
                .unwrap_or(0);
            dispatch(
                self.notifier.as_ref(),
                Notification::new(
                    recruiter.account_id(),
                    NotificationKind::RecruiterJobsPaused { jobs_paused },
                    now,
                ),
            );
        }
        dispatch(
            self.notifier.as_ref(),
            Notification::new(business_id, NotificationKind::BusinessRevoked, now),
        );
        info!(
            %business_id,
            jobs_revoked,
            recruiters_unlinked,
            links_removed,
            "business revoked"
        );

        Ok(BusinessRevocation {
            business_id,
            jobs_revoked,
            recruiters_unlinked,
            links_removed,
        })
    }
}
