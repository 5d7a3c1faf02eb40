use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use jobgrid_core::{AccountId, ApplicationId, DomainError, DomainResult, Entity, JobId, ValueObject};
use jobgrid_store::Document;

/// Application pipeline lifecycle.
///
/// `applied → under_review` (auto, first recruiter view) `→ shortlisted →
/// round_update ⇄ round_update → {rejected, hired}`; a jobseeker may withdraw
/// from any non-terminal state. `{rejected, hired, withdrawn}` are absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    UnderReview,
    Shortlisted,
    RoundUpdate,
    Rejected,
    Hired,
    Withdrawn,
}

impl ApplicationStatus {
    /// Absorbing: no transition leaves these states.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Rejected | ApplicationStatus::Hired | ApplicationStatus::Withdrawn
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundResult {
    Scheduled,
    Passed,
    Failed,
    Pending,
}

/// One entry of the per-round log. Ordered by round number (the log's
/// invariant), not by insertion order: re-grading a round replaces its entry
/// in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundUpdate {
    pub round: u32,
    pub result: RoundResult,
    pub note: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Applicant fields frozen at submission time.
///
/// Never re-synced from the live profile: history stays accurate even if the
/// jobseeker later edits or deletes profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantSnapshot {
    pub full_name: String,
    pub email: String,
    pub headline: Option<String>,
    /// Resume reference captured at submission (required to apply).
    pub resume: String,
}

impl ValueObject for ApplicantSnapshot {}

/// Application document: one per (job, jobseeker) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    id: ApplicationId,
    job_id: JobId,
    applicant_id: AccountId,
    snapshot: ApplicantSnapshot,
    skills: Vec<String>,
    cover_letter: Option<String>,
    status: ApplicationStatus,
    /// 1-based index into the job's round list, present once shortlisted.
    current_round: Option<u32>,
    round_updates: Vec<RoundUpdate>,
    applied_at: DateTime<Utc>,
    shortlisted_at: Option<DateTime<Utc>>,
    rejected_at: Option<DateTime<Utc>>,
    rejection_reason: Option<String>,
    hired_at: Option<DateTime<Utc>>,
    withdrawn_at: Option<DateTime<Utc>>,
}

impl Application {
    #[allow(clippy::too_many_arguments)]
    pub fn submit(
        id: ApplicationId,
        job_id: JobId,
        applicant_id: AccountId,
        snapshot: ApplicantSnapshot,
        skills: Vec<String>,
        cover_letter: Option<String>,
        applied_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            job_id,
            applicant_id,
            snapshot,
            skills,
            cover_letter,
            status: ApplicationStatus::Applied,
            current_round: None,
            round_updates: Vec::new(),
            applied_at,
            shortlisted_at: None,
            rejected_at: None,
            rejection_reason: None,
            hired_at: None,
            withdrawn_at: None,
        }
    }

    pub fn application_id(&self) -> ApplicationId {
        self.id
    }

    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    pub fn applicant_id(&self) -> AccountId {
        self.applicant_id
    }

    pub fn snapshot(&self) -> &ApplicantSnapshot {
        &self.snapshot
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn cover_letter(&self) -> Option<&str> {
        self.cover_letter.as_deref()
    }

    pub fn status(&self) -> ApplicationStatus {
        self.status
    }

    pub fn current_round(&self) -> Option<u32> {
        self.current_round
    }

    pub fn round_updates(&self) -> &[RoundUpdate] {
        &self.round_updates
    }

    pub fn applied_at(&self) -> DateTime<Utc> {
        self.applied_at
    }

    pub fn shortlisted_at(&self) -> Option<DateTime<Utc>> {
        self.shortlisted_at
    }

    pub fn rejected_at(&self) -> Option<DateTime<Utc>> {
        self.rejected_at
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    pub fn hired_at(&self) -> Option<DateTime<Utc>> {
        self.hired_at
    }

    pub fn withdrawn_at(&self) -> Option<DateTime<Utc>> {
        self.withdrawn_at
    }

    fn ensure_not_terminal(&self) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::invalid_transition(format!(
                "application is {:?}, an absorbing state",
                self.status
            )));
        }
        Ok(())
    }

    /// First recruiter view: `applied → under_review`. Idempotent; returns
    /// whether anything changed.
    pub fn mark_under_review(&mut self) -> bool {
        if self.status == ApplicationStatus::Applied {
            self.status = ApplicationStatus::UnderReview;
            true
        } else {
            false
        }
    }

    /// Move into the interview pipeline at round 1. If the job defines at
    /// least one round, records a `scheduled` entry for it.
    pub fn shortlist(
        &mut self,
        note: Option<String>,
        total_rounds: usize,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_not_terminal()?;
        self.status = ApplicationStatus::Shortlisted;
        self.current_round = Some(1);
        self.shortlisted_at = Some(now);
        if total_rounds >= 1 {
            self.upsert_round(1, RoundResult::Scheduled, note, now);
        }
        Ok(())
    }

    /// Record an interview round outcome.
    ///
    /// - `failed` is absorbing: the application moves to `rejected`, with the
    ///   reason defaulted from the note.
    /// - `passed` on the last defined round is absorbing: `hired`.
    /// - `passed` with a next round and `advance_to_next` schedules it and
    ///   increments `current_round`.
    /// - anything else just updates the log (re-grading replaces in place).
    ///
    /// Returns the status the application landed in.
    pub fn update_round(
        &mut self,
        round_number: u32,
        result: RoundResult,
        note: Option<String>,
        advance_to_next: bool,
        total_rounds: usize,
        now: DateTime<Utc>,
    ) -> DomainResult<ApplicationStatus> {
        self.ensure_not_terminal()?;
        if self.current_round.is_none() {
            return Err(DomainError::invalid_transition(
                "application has not been shortlisted",
            ));
        }
        if round_number == 0 || round_number as usize > total_rounds {
            return Err(DomainError::validation(format!(
                "round {round_number} is not defined for this job"
            )));
        }

        match result {
            RoundResult::Failed => {
                let reason = note
                    .clone()
                    .unwrap_or_else(|| format!("failed round {round_number}"));
                self.upsert_round(round_number, RoundResult::Failed, note, now);
                self.status = ApplicationStatus::Rejected;
                self.rejected_at = Some(now);
                self.rejection_reason = Some(reason);
            }
            RoundResult::Passed => {
                self.upsert_round(round_number, RoundResult::Passed, note, now);
                if (round_number as usize) >= total_rounds {
                    self.status = ApplicationStatus::Hired;
                    self.hired_at = Some(now);
                } else if advance_to_next {
                    let next = round_number + 1;
                    self.current_round = Some(next);
                    self.status = ApplicationStatus::RoundUpdate;
                    self.upsert_round(next, RoundResult::Scheduled, None, now);
                } else {
                    self.status = ApplicationStatus::RoundUpdate;
                }
            }
            RoundResult::Scheduled | RoundResult::Pending => {
                self.upsert_round(round_number, result, note, now);
                self.status = ApplicationStatus::RoundUpdate;
            }
        }

        Ok(self.status)
    }

    /// Recruiter-side outright rejection.
    pub fn reject(&mut self, reason: Option<String>, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_not_terminal()?;
        self.status = ApplicationStatus::Rejected;
        self.rejected_at = Some(now);
        self.rejection_reason = reason;
        Ok(())
    }

    /// Jobseeker-side withdrawal.
    pub fn withdraw(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_not_terminal()?;
        self.status = ApplicationStatus::Withdrawn;
        self.withdrawn_at = Some(now);
        Ok(())
    }

    // Replace-in-place if an entry for the round exists, otherwise insert
    // keeping the log sorted by round number.
    fn upsert_round(
        &mut self,
        round: u32,
        result: RoundResult,
        note: Option<String>,
        now: DateTime<Utc>,
    ) {
        let entry = RoundUpdate {
            round,
            result,
            note,
            updated_at: now,
        };
        match self.round_updates.binary_search_by_key(&round, |u| u.round) {
            Ok(i) => self.round_updates[i] = entry,
            Err(i) => self.round_updates.insert(i, entry),
        }
    }
}

impl Entity for Application {
    type Id = ApplicationId;

    fn id(&self) -> &ApplicationId {
        &self.id
    }
}

impl Document for Application {
    type Id = ApplicationId;

    fn id(&self) -> ApplicationId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ApplicantSnapshot {
        ApplicantSnapshot {
            full_name: "Jo Seeker".to_string(),
            email: "jo@example.com".to_string(),
            headline: Some("Rustacean".to_string()),
            resume: "resumes/jo.pdf".to_string(),
        }
    }

    fn fresh_application() -> Application {
        Application::submit(
            ApplicationId::new(),
            JobId::new(),
            AccountId::new(),
            snapshot(),
            vec!["rust".to_string()],
            None,
            Utc::now(),
        )
    }

    #[test]
    fn first_view_moves_to_under_review_then_noops() {
        let mut app = fresh_application();
        assert!(app.mark_under_review());
        assert_eq!(app.status(), ApplicationStatus::UnderReview);
        assert!(!app.mark_under_review());
        assert_eq!(app.status(), ApplicationStatus::UnderReview);
    }

    #[test]
    fn shortlist_schedules_round_one_when_rounds_defined() {
        let mut app = fresh_application();
        app.mark_under_review();
        app.shortlist(Some("strong profile".to_string()), 2, Utc::now())
            .unwrap();

        assert_eq!(app.status(), ApplicationStatus::Shortlisted);
        assert_eq!(app.current_round(), Some(1));
        assert!(app.shortlisted_at().is_some());
        let log = app.round_updates();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].round, 1);
        assert_eq!(log[0].result, RoundResult::Scheduled);
    }

    #[test]
    fn shortlist_without_rounds_leaves_log_empty() {
        let mut app = fresh_application();
        app.shortlist(None, 0, Utc::now()).unwrap();
        assert_eq!(app.current_round(), Some(1));
        assert!(app.round_updates().is_empty());
    }

    #[test]
    fn shortlisting_a_rejected_application_is_invalid() {
        let mut app = fresh_application();
        app.reject(Some("not a fit".to_string()), Utc::now()).unwrap();
        assert!(matches!(
            app.shortlist(None, 1, Utc::now()).unwrap_err(),
            DomainError::InvalidTransition(_)
        ));
    }

    #[test]
    fn failed_round_rejects_with_reason_defaulted_from_note() {
        let mut app = fresh_application();
        app.shortlist(None, 2, Utc::now()).unwrap();

        let status = app
            .update_round(1, RoundResult::Failed, None, false, 2, Utc::now())
            .unwrap();
        assert_eq!(status, ApplicationStatus::Rejected);
        assert_eq!(app.rejection_reason(), Some("failed round 1"));
        assert!(app.rejected_at().is_some());
    }

    #[test]
    fn passing_the_last_round_hires() {
        let mut app = fresh_application();
        app.shortlist(None, 2, Utc::now()).unwrap();

        let status = app
            .update_round(1, RoundResult::Passed, None, true, 2, Utc::now())
            .unwrap();
        assert_eq!(status, ApplicationStatus::RoundUpdate);
        assert_eq!(app.current_round(), Some(2));
        // Advancing scheduled round 2.
        assert_eq!(app.round_updates()[1].result, RoundResult::Scheduled);

        let status = app
            .update_round(2, RoundResult::Passed, Some("great".to_string()), true, 2, Utc::now())
            .unwrap();
        assert_eq!(status, ApplicationStatus::Hired);
        assert!(app.hired_at().is_some());
    }

    #[test]
    fn updating_a_round_on_a_hired_application_is_invalid() {
        let mut app = fresh_application();
        app.shortlist(None, 1, Utc::now()).unwrap();
        app.update_round(1, RoundResult::Passed, None, true, 1, Utc::now())
            .unwrap();
        assert_eq!(app.status(), ApplicationStatus::Hired);

        assert!(matches!(
            app.update_round(1, RoundResult::Failed, None, false, 1, Utc::now())
                .unwrap_err(),
            DomainError::InvalidTransition(_)
        ));
    }

    #[test]
    fn regrading_replaces_the_entry_in_place() {
        let mut app = fresh_application();
        app.shortlist(None, 3, Utc::now()).unwrap();
        app.update_round(1, RoundResult::Pending, None, false, 3, Utc::now())
            .unwrap();
        app.update_round(2, RoundResult::Scheduled, None, false, 3, Utc::now())
            .unwrap();

        // Re-grade round 1; the log keeps one entry per round, ordered.
        app.update_round(1, RoundResult::Passed, Some("redo".to_string()), false, 3, Utc::now())
            .unwrap();
        let rounds: Vec<u32> = app.round_updates().iter().map(|u| u.round).collect();
        assert_eq!(rounds, vec![1, 2]);
        assert_eq!(app.round_updates()[0].result, RoundResult::Passed);
        assert_eq!(app.round_updates()[0].note.as_deref(), Some("redo"));
    }

    #[test]
    fn update_round_requires_shortlisting_first() {
        let mut app = fresh_application();
        assert!(matches!(
            app.update_round(1, RoundResult::Passed, None, false, 2, Utc::now())
                .unwrap_err(),
            DomainError::InvalidTransition(_)
        ));
    }

    #[test]
    fn undefined_rounds_are_rejected() {
        let mut app = fresh_application();
        app.shortlist(None, 2, Utc::now()).unwrap();
        assert!(matches!(
            app.update_round(3, RoundResult::Passed, None, false, 2, Utc::now())
                .unwrap_err(),
            DomainError::Validation(_)
        ));
        assert!(matches!(
            app.update_round(0, RoundResult::Passed, None, false, 2, Utc::now())
                .unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[test]
    fn withdraw_is_guarded_against_absorbing_states() {
        let mut app = fresh_application();
        app.withdraw(Utc::now()).unwrap();
        assert_eq!(app.status(), ApplicationStatus::Withdrawn);
        assert!(app.withdraw(Utc::now()).is_err());
        assert!(app.reject(None, Utc::now()).is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn result_strategy() -> impl Strategy<Value = RoundResult> {
            prop_oneof![
                Just(RoundResult::Scheduled),
                Just(RoundResult::Passed),
                Just(RoundResult::Pending),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: whatever order rounds are graded and re-graded in,
            /// the log holds at most one entry per round, sorted by round.
            #[test]
            fn round_log_stays_sorted_and_unique(
                updates in proptest::collection::vec((1u32..=6, result_strategy()), 0..24)
            ) {
                let mut app = fresh_application();
                app.shortlist(None, 6, Utc::now()).unwrap();
                for (round, result) in updates {
                    if app.status().is_terminal() {
                        break;
                    }
                    let _ = app.update_round(round, result, None, false, 6, Utc::now());
                    let log = app.round_updates();
                    for pair in log.windows(2) {
                        prop_assert!(pair[0].round < pair[1].round);
                    }
                }
            }
        }
    }
}
