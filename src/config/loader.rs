//! Configuration loading from disk and environment.
//!
//! Precedence, lowest first: built-in defaults, TOML file, environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::DispatcherConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_PRIMARY_URL: &str = "API_DISPATCHER_PRIMARY_URL";
pub const ENV_SECONDARY_URLS: &str = "API_DISPATCHER_SECONDARY_URLS";
pub const ENV_TIMEOUT_SECS: &str = "API_DISPATCHER_TIMEOUT_SECS";
pub const ENV_MAX_ATTEMPTS: &str = "API_DISPATCHER_MAX_ATTEMPTS";
pub const ENV_DEV_LOGGING: &str = "API_DISPATCHER_DEV_LOGGING";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for {key}")]
    Env { key: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a TOML file, apply environment overrides and validate.
pub fn load_config(path: &Path) -> Result<DispatcherConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: DispatcherConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build a configuration from defaults and the process environment.
pub fn from_env() -> Result<DispatcherConfig, ConfigError> {
    let mut config = DispatcherConfig::default();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply overrides resolved through `lookup`. Empty values count as unset.
pub fn apply_env_overrides<F>(config: &mut DispatcherConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(primary) = get(ENV_PRIMARY_URL) {
        config.endpoints.primary = primary.trim().to_string();
    }

    if let Some(secondaries) = get(ENV_SECONDARY_URLS) {
        config.endpoints.secondaries = secondaries
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }

    if let Some(value) = get(ENV_TIMEOUT_SECS) {
        config.timeouts.request_secs = value.trim().parse().map_err(|_| ConfigError::Env {
            key: ENV_TIMEOUT_SECS,
            value: value.clone(),
        })?;
    }

    if let Some(value) = get(ENV_MAX_ATTEMPTS) {
        let attempts = value.trim().parse().map_err(|_| ConfigError::Env {
            key: ENV_MAX_ATTEMPTS,
            value: value.clone(),
        })?;
        config.dispatch.max_attempts = Some(attempts);
    }

    if let Some(value) = get(ENV_DEV_LOGGING) {
        config.observability.dev_logging = match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                return Err(ConfigError::Env {
                    key: ENV_DEV_LOGGING,
                    value,
                })
            }
        };
    }

    Ok(())
}
