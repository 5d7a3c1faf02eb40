//! Observability: logging/tracing setup for processes embedding the engine.

pub mod tracing;
