//! Applications and the multi-round hiring pipeline.

pub mod application;

pub use application::{
    ApplicantSnapshot, Application, ApplicationStatus, RoundResult, RoundUpdate,
};
