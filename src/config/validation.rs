//! Configuration validation.
//!
//! Returns all validation errors, not just the first. Beyond requiring a
//! primary URL, endpoint URLs are not checked here: a malformed URL shows up
//! as a connection failure when a request is attempted against it.

use thiserror::Error;

use crate::config::schema::DispatcherConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("endpoints.primary must not be empty")]
    EmptyPrimaryUrl,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("dispatch.max_attempts must be at least 1 when set")]
    ZeroMaxAttempts,

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Check a configuration before it is accepted.
pub fn validate_config(config: &DispatcherConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.endpoints.primary.trim().is_empty() {
        errors.push(ValidationError::EmptyPrimaryUrl);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.dispatch.max_attempts == Some(0) {
        errors.push(ValidationError::ZeroMaxAttempts);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
