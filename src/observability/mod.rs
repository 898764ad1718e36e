//! Observability subsystem.
//!
//! # Responsibilities
//! - Structured logging initialization (tracing)
//! - Metric names and recording helpers for breakers, retries, requests

pub mod logging;
pub mod metrics;
