//! Dispatch metrics.
//!
//! # Metrics
//! - `dispatch_requests_total` (counter): logical calls by method, outcome
//! - `dispatch_request_duration_seconds` (histogram): end-to-end latency,
//!   all attempts included
//! - `dispatch_attempts_total` (counter): attempts by endpoint
//! - `dispatch_failovers_total` (counter): failovers by reason
//!
//! Recorded through the `metrics` facade; the host application installs the
//! exporter.

use std::time::Instant;

use metrics::{counter, histogram};

/// Record the end of a logical call.
pub fn record_request(method: &str, outcome: &'static str, start: Instant) {
    let duration = start.elapsed().as_secs_f64();
    let method = method.to_string();

    counter!("dispatch_requests_total", "method" => method.clone(), "outcome" => outcome)
        .increment(1);
    histogram!("dispatch_request_duration_seconds", "method" => method).record(duration);
}

/// Record one attempt against an endpoint.
pub fn record_attempt(base_url: &str) {
    counter!("dispatch_attempts_total", "base_url" => base_url.to_string()).increment(1);
}

/// Record a move to the next endpoint.
pub fn record_failover(reason: &'static str) {
    counter!("dispatch_failovers_total", "reason" => reason).increment(1);
}
