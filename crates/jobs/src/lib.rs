//! Job postings and their approval lifecycle.

pub mod job;

pub use job::{Job, JobDetails, JobStatus, RoundDefinition, RoundType};
