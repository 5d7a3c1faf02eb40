//! `jobgrid-engine` — the cross-entity lifecycle and cascade engine.
//!
//! Four managers own the marketplace's state machines: business approval,
//! recruiter↔business linking, job approval, and the application pipeline.
//! Each operation is a short-lived unit of work: read, validate the
//! transition on a local copy, then commit through the store's conditional
//! single-document update (filter on id + expected status). Cascades touch
//! their dependent entities first and write the authoritative status flag
//! last, so an aborted cascade leaves the system re-runnable, never
//! half-committed on the flag that gates everything else.
//!
//! The managers compose the `Collection` and `NotificationPort` traits, so
//! they run identically over the in-memory store (tests/dev) and any real
//! document store adapter.

pub mod applications;
pub mod business;
pub mod error;
pub mod jobs;
pub mod links;


use std::sync::Arc;

use jobgrid_accounts::Account;
use jobgrid_applications::Application;
use jobgrid_jobs::Job;
use jobgrid_links::Link;
use jobgrid_notify::NotificationPort;
use jobgrid_store::Collection;

pub use applications::{ApplicationPipeline, RoundOutcome};
pub use business::{BusinessApproval, BusinessLifecycle, BusinessRevocation};
pub use error::{EngineError, EngineResult};
pub use jobs::JobLifecycle;
pub use links::{LinkRequestOutcome, LinkWorkflow};

/// Shared handles to the entity store collections and the notification port.
pub type AccountStore = Arc<dyn Collection<Account>>;
pub type JobStore = Arc<dyn Collection<Job>>;
pub type LinkStore = Arc<dyn Collection<Link>>;
pub type ApplicationStore = Arc<dyn Collection<Application>>;
pub type Notifier = Arc<dyn NotificationPort>;

/// Convenience bundle wiring all four managers over one set of handles.
pub struct Engine {
    pub business: BusinessLifecycle,
    pub links: LinkWorkflow,
    pub jobs: JobLifecycle,
    pub applications: ApplicationPipeline,
}

impl Engine {
    pub fn new(
        accounts: AccountStore,
        jobs: JobStore,
        links: LinkStore,
        applications: ApplicationStore,
        notifier: Notifier,
    ) -> Self {
        Self {
            business: BusinessLifecycle::new(
                accounts.clone(),
                jobs.clone(),
                links.clone(),
                notifier.clone(),
            ),
            links: LinkWorkflow::new(accounts.clone(), links.clone(), notifier.clone()),
            jobs: JobLifecycle::new(accounts.clone(), jobs.clone(), notifier.clone()),
            applications: ApplicationPipeline::new(accounts, jobs, applications, notifier),
        }
    }
}
