//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): inbound requests by path, status
//! - `relay_request_duration_seconds` (histogram): time to response headers
//! - `relay_upstream_attempts_total` (counter): attempts by outcome
//! - `relay_retry_wait_seconds` (histogram): rate-limit backoff waits
//! - `relay_streams_total` (counter): relayed streams by end state
//! - `relay_relayed_bytes_total` (counter): bytes passed to callers
//!
//! # Design Decisions
//! - Thin free functions so call sites stay one-liners and metric names
//!   live in a single file
//! - Recording never fails a request; the exporter is optional

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed inbound request (status as seen by the caller).
pub fn record_request(path: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "relay_requests_total",
        "path" => path,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("relay_request_duration_seconds", "path" => path)
        .record(start.elapsed().as_secs_f64());
}

/// Record the outcome of one upstream attempt.
pub fn record_upstream_attempt(outcome: &'static str) {
    metrics::counter!("relay_upstream_attempts_total", "outcome" => outcome).increment(1);
}

/// Record a rate-limit backoff wait.
pub fn record_retry_wait(wait: Duration) {
    metrics::histogram!("relay_retry_wait_seconds").record(wait.as_secs_f64());
}

/// Record the end of a relayed stream.
pub fn record_stream_end(bytes: u64, truncated: bool) {
    let outcome = if truncated { "truncated" } else { "complete" };
    metrics::counter!("relay_streams_total", "outcome" => outcome).increment(1);
    metrics::counter!("relay_relayed_bytes_total").increment(bytes);
}
