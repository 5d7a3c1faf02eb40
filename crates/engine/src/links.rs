//! Recruiter↔Business link workflow.

use chrono::Utc;
use tracing::info;

use jobgrid_accounts::Account;
use jobgrid_core::{codes, AccountId, LinkId};
use jobgrid_links::{Link, LinkStatus};
use jobgrid_notify::{dispatch, Notification, NotificationKind};

use crate::error::{cascade_step, EngineError, EngineResult};
use crate::{AccountStore, LinkStore, Notifier};

/// Outcome of a link request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRequestOutcome {
    /// A pending request now awaits the business's decision.
    Requested(LinkId),
    /// The pair is already linked; the request is an idempotent no-op.
    AlreadyLinked(LinkId),
}

/// Owns the bilateral request/approve/reject/unlink/remove workflow and is
/// the only writer of `linked_business` on recruiter accounts.
pub struct LinkWorkflow {
    accounts: AccountStore,
    links: LinkStore,
    notifier: Notifier,
}

impl LinkWorkflow {
    pub fn new(accounts: AccountStore, links: LinkStore, notifier: Notifier) -> Self {
        Self {
            accounts,
            links,
            notifier,
        }
    }

    /// Recruiter asks to act for a business.
    ///
    /// The pair keeps a single historical Link record: a terminal record is
    /// reset to `pending` (same identity, terminal timestamps cleared) rather
    /// than duplicated, which keeps `removed_by_business` meaningful only for
    /// the current relationship.
    pub fn request(
        &self,
        recruiter_id: AccountId,
        business_id: AccountId,
    ) -> EngineResult<LinkRequestOutcome> {
        let now = Utc::now();
        let recruiter = self
            .accounts
            .find_by_id(&recruiter_id)?
            .ok_or(EngineError::NotFound)?;
        recruiter.as_recruiter()?;

        let business = self
            .accounts
            .find_by_id(&business_id)?
            .ok_or(EngineError::NotFound)?;
        if !business.as_business()?.is_approved() {
            return Err(EngineError::InvalidTransition(
                "business is not approved".to_string(),
            ));
        }

        let existing = self
            .links
            .find_one(&|l: &Link| l.is_pair(recruiter_id, business_id))?;

        let link_id = match existing {
            Some(link) => match link.status() {
                LinkStatus::Approved => {
                    info!(%recruiter_id, %business_id, "link request is a no-op, already linked");
                    return Ok(LinkRequestOutcome::AlreadyLinked(link.link_id()));
                }
                LinkStatus::Pending => {
                    return Err(EngineError::Conflict {
                        code: codes::DUPLICATE_PENDING_LINK,
                        message: "a pending request for this pair already exists".to_string(),
                    });
                }
                _ => {
                    // Reuse the terminal record.
                    let id = link.link_id();
                    self.links
                        .update_one(
                            &|l: &Link| l.link_id() == id && l.status().is_terminal(),
                            &|l| {
                                let _ = l.reset_to_pending(now);
                            },
                        )?
                        .ok_or_else(|| EngineError::stale("link is no longer terminal"))?;
                    id
                }
            },
            None => {
                let link = Link::request(LinkId::new(), recruiter_id, business_id, now);
                let id = link.link_id();
                self.links.create(link)?;
                id
            }
        };

        dispatch(
            self.notifier.as_ref(),
            Notification::new(
                business_id,
                NotificationKind::LinkRequested {
                    link_id,
                    recruiter_id,
                },
                now,
            ),
        );
        info!(%recruiter_id, %business_id, %link_id, "link requested");
        Ok(LinkRequestOutcome::Requested(link_id))
    }

    /// Business accepts a pending request.
    ///
    /// The recruiter's link slot is written first, conditionally on being
    /// empty: concurrent approvals from two businesses race on that single
    /// document and the loser gets a conflict, which is what keeps the
    /// at-most-one-link invariant under races.
    pub fn approve(&self, link_id: LinkId) -> EngineResult<()> {
        let now = Utc::now();
        let link = self
            .links
            .find_by_id(&link_id)?
            .ok_or(EngineError::NotFound)?;
        if link.status() != LinkStatus::Pending {
            return Err(EngineError::InvalidTransition(format!(
                "link cannot be approved from {:?}",
                link.status()
            )));
        }
        let recruiter_id = link.recruiter_id();
        let business_id = link.business_id();

        let claimed = self.accounts.update_one(
            &|a: &Account| {
                a.account_id() == recruiter_id
                    && a.as_recruiter()
                        .map(|r| r.linked_business().is_none())
                        .unwrap_or(false)
            },
            &|a| {
                if let Ok(r) = a.as_recruiter_mut() {
                    let _ = r.set_linked_business(business_id);
                }
            },
        )?;
        if claimed.is_none() {
            // Distinguish a vanished recruiter from a lost race.
            return match self.accounts.find_by_id(&recruiter_id)? {
                None => Err(EngineError::NotFound),
                Some(_) => Err(EngineError::Conflict {
                    code: codes::RECRUITER_ALREADY_LINKED,
                    message: "recruiter already holds an active link".to_string(),
                }),
            };
        }

        let updated = self.links.update_one(
            &|l: &Link| l.link_id() == link_id && l.status() == LinkStatus::Pending,
            &|l| {
                let _ = l.approve(now);
            },
        )?;
        if updated.is_none() {
            // The link changed underneath us; release the slot we claimed.
            self.accounts.update_by_id(&recruiter_id, &|a| {
                if let Ok(r) = a.as_recruiter_mut() {
                    r.clear_linked_business();
                }
            })?;
            return Err(EngineError::stale("link is no longer pending"));
        }

        dispatch(
            self.notifier.as_ref(),
            Notification::new(
                recruiter_id,
                NotificationKind::LinkApproved {
                    link_id,
                    business_id,
                },
                now,
            ),
        );
        info!(%link_id, %recruiter_id, %business_id, "link approved");
        Ok(())
    }

    /// Business declines a pending request. No cascade.
    pub fn reject(&self, link_id: LinkId, reason: Option<String>) -> EngineResult<()> {
        let now = Utc::now();
        let link = self
            .links
            .find_by_id(&link_id)?
            .ok_or(EngineError::NotFound)?;
        if link.status() != LinkStatus::Pending {
            return Err(EngineError::InvalidTransition(format!(
                "link cannot be rejected from {:?}",
                link.status()
            )));
        }

        let patch_reason = reason.clone();
        self.links
            .update_one(
                &|l: &Link| l.link_id() == link_id && l.status() == LinkStatus::Pending,
                &|l| {
                    let _ = l.reject(patch_reason.clone(), now);
                },
            )?
            .ok_or_else(|| EngineError::stale("link is no longer pending"))?;

        dispatch(
            self.notifier.as_ref(),
            Notification::new(
                link.recruiter_id(),
                NotificationKind::LinkRejected { link_id, reason },
                now,
            ),
        );
        info!(%link_id, "link rejected");
        Ok(())
    }

    /// Recruiter walks away from their business.
    ///
    /// Deliberately gentler than business-initiated removal: the link ends as
    /// `unlinked` (not `removed_by_business`) and the recruiter's jobs are
    /// left untouched.
    pub fn unlink(&self, recruiter_id: AccountId) -> EngineResult<()> {
        let now = Utc::now();
        let recruiter = self
            .accounts
            .find_by_id(&recruiter_id)?
            .ok_or(EngineError::NotFound)?;
        let business_id = recruiter
            .as_recruiter()?
            .linked_business()
            .ok_or_else(|| {
                EngineError::InvalidTransition("recruiter has no linked business".to_string())
            })?;

        cascade_step(
            "unlink_links",
            self.links.update_many(
                &|l: &Link| {
                    l.is_pair(recruiter_id, business_id) && l.status() == LinkStatus::Approved
                },
                &|l| {
                    let _ = l.unlink(now);
                },
            ),
        )?;

        self.accounts
            .update_one(
                &|a: &Account| {
                    a.account_id() == recruiter_id && a.linked_business() == Some(business_id)
                },
                &|a| {
                    if let Ok(r) = a.as_recruiter_mut() {
                        r.clear_linked_business();
                    }
                },
            )?
            .ok_or_else(|| EngineError::stale("recruiter link changed concurrently"))?;

        dispatch(
            self.notifier.as_ref(),
            Notification::new(
                business_id,
                NotificationKind::RecruiterUnlinked { recruiter_id },
                now,
            ),
        );
        info!(%recruiter_id, %business_id, "recruiter unlinked");
        Ok(())
    }

    /// Business disconnects one of its recruiters.
    ///
    /// Ends the link as `removed_by_business` — the durable signal a later
    /// re-approval of the business keys off.
    pub fn remove(&self, business_id: AccountId, recruiter_id: AccountId) -> EngineResult<()> {
        let now = Utc::now();
        let recruiter = self
            .accounts
            .find_by_id(&recruiter_id)?
            .ok_or(EngineError::NotFound)?;
        if !recruiter.as_recruiter()?.is_linked_to(business_id) {
            return Err(EngineError::InvalidTransition(
                "recruiter is not linked to this business".to_string(),
            ));
        }

        cascade_step(
            "remove_links",
            self.links.update_many(
                &|l: &Link| {
                    l.is_pair(recruiter_id, business_id) && l.status() == LinkStatus::Approved
                },
                &|l| {
                    let _ = l.remove_by_business(now);
                },
            ),
        )?;

        self.accounts
            .update_one(
                &|a: &Account| {
                    a.account_id() == recruiter_id && a.linked_business() == Some(business_id)
                },
                &|a| {
                    if let Ok(r) = a.as_recruiter_mut() {
                        r.clear_linked_business();
                    }
                },
            )?
            .ok_or_else(|| EngineError::stale("recruiter link changed concurrently"))?;

        dispatch(
            self.notifier.as_ref(),
            Notification::new(
                recruiter_id,
                NotificationKind::RecruiterRemoved { business_id },
                now,
            ),
        );
        info!(%recruiter_id, %business_id, "recruiter removed by business");
        Ok(())
    }
}
