//! Metrics collection and exposition.
//!
//! # Metrics
//! - `breaker_transitions_total` (counter): state changes by breaker, state
//! - `breaker_rejections_total` (counter): fail-fast rejections by breaker
//! - `client_retries_total` (counter): retry attempts by operation
//! - `client_requests_total` (counter): outcomes by kind, outcome
//!
//! # Design Decisions
//! - Low-overhead updates through the metrics facade; recording is
//!   always safe even when no recorder is installed
//! - Prometheus exposition is opt-in for embedding processes

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::resilience::circuit_breaker::BreakerState;

/// Install the Prometheus recorder and HTTP exposition endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Count a breaker state transition.
pub fn record_breaker_transition(breaker: &str, state: BreakerState) {
    counter!(
        "breaker_transitions_total",
        "breaker" => breaker.to_string(),
        "state" => state.as_str()
    )
    .increment(1);
}

/// Count a fail-fast rejection by an open breaker.
pub fn record_breaker_rejection(breaker: &str) {
    counter!("breaker_rejections_total", "breaker" => breaker.to_string()).increment(1);
}

/// Count one retry attempt for an operation.
pub fn record_retry(operation: &str) {
    counter!("client_retries_total", "operation" => operation.to_string()).increment(1);
}

/// Count a finished call, by client kind ("http" / "rpc") and outcome.
pub fn record_request_outcome(kind: &'static str, success: bool) {
    counter!(
        "client_requests_total",
        "kind" => kind,
        "outcome" => if success { "success" } else { "failure" }
    )
    .increment(1);
}
