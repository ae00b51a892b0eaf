//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every field has a default so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Default primary API base URL.
pub const DEFAULT_PRIMARY_URL: &str = "https://api.example.com";

/// Default secondary API base URL.
pub const DEFAULT_SECONDARY_URL: &str = "http://localhost:5000";

/// Root configuration for the dispatcher.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Ordered API base URLs.
    pub endpoints: EndpointsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Failover policy settings.
    pub dispatch: DispatchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Credential store settings.
    pub credentials: CredentialsConfig,
}

/// Endpoint list, primary first.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct EndpointsConfig {
    /// Primary API base URL.
    pub primary: String,

    /// Secondary base URLs, tried in order after the primary.
    pub secondaries: Vec<String>,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY_URL.to_string(),
            secondaries: vec![DEFAULT_SECONDARY_URL.to_string()],
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Per-endpoint request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 10 }
    }
}

/// Failover policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct DispatchConfig {
    /// Upper bound on attempts per call. Unset means one attempt per endpoint.
    pub max_attempts: Option<usize>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,

    /// Log request/response details (method, URL, body, token preview).
    pub dev_logging: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            dev_logging: cfg!(debug_assertions),
        }
    }
}

/// Credential store configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Path of the JSON file holding the bearer token and user record.
    pub store_path: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            store_path: ".api-dispatcher/credentials.json".to_string(),
        }
    }
}
