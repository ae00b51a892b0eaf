//! Failover policy.
//!
//! # Responsibilities
//! - Decide how many endpoints a call may touch
//! - Decide, after a failed attempt, whether to move to the next endpoint
//!
//! # Design Decisions
//! - Network failures (no response) and 5xx are endpoint-specific: fail over
//! - 4xx (401 included) would fail identically everywhere: stop
//! - Setup errors never reached the wire: stop
//! - No backoff between attempts; the next endpoint is tried immediately

use crate::error::DispatchError;

/// What the dispatcher does after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Try the next endpoint in registry order.
    Failover,
    /// Return this error to the caller.
    Fail,
}

/// Number of attempts for a call: one per endpoint, capped by `max_attempts`.
pub fn effective_attempts(endpoints: usize, max_attempts: Option<usize>) -> usize {
    match max_attempts {
        Some(max) => max.min(endpoints),
        None => endpoints,
    }
}

/// Decide the next step after attempt `index` (0-based) failed with `error`.
pub fn next_step(index: usize, attempts: usize, error: &DispatchError) -> Step {
    if error.is_retryable() && index + 1 < attempts {
        Step::Failover
    } else {
        Step::Fail
    }
}

/// Label describing why a failover happened.
pub fn failover_reason(error: &DispatchError) -> &'static str {
    match error {
        DispatchError::Network { timed_out: true, .. } => "timeout",
        DispatchError::Network { .. } => "network",
        _ => "server_error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> DispatchError {
        DispatchError::Http {
            status,
            base_url: "http://a".into(),
            url: "/".into(),
            message: None,
            body: String::new(),
        }
    }

    fn network() -> DispatchError {
        DispatchError::Network {
            base_url: "http://a".into(),
            reason: "connection refused".into(),
            timed_out: false,
        }
    }

    #[test]
    fn test_effective_attempts() {
        assert_eq!(effective_attempts(3, None), 3);
        assert_eq!(effective_attempts(3, Some(1)), 1);
        assert_eq!(effective_attempts(2, Some(5)), 2);
    }

    #[test]
    fn test_failover_on_transient_errors() {
        assert_eq!(next_step(0, 2, &http(503)), Step::Failover);
        assert_eq!(next_step(0, 2, &network()), Step::Failover);
        // Last endpoint: nothing left to try.
        assert_eq!(next_step(1, 2, &http(500)), Step::Fail);
    }

    #[test]
    fn test_no_failover_on_client_errors() {
        for status in [400, 401, 403, 404, 422] {
            assert_eq!(next_step(0, 3, &http(status)), Step::Fail, "status {status}");
        }
        assert_eq!(next_step(0, 3, &DispatchError::Setup("x".into())), Step::Fail);
    }

    #[test]
    fn test_failover_reason() {
        assert_eq!(failover_reason(&network()), "network");
        assert_eq!(failover_reason(&http(502)), "server_error");
    }
}
