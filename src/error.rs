//! Dispatch error taxonomy.
//!
//! Every failure a caller can observe is one variant of [`DispatchError`], so
//! the failover policy matches on the variant instead of probing fields.

use thiserror::Error;

/// Errors surfaced by the dispatcher and the per-endpoint clients.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The endpoint answered with a non-2xx status.
    #[error(
        "HTTP {status} from {base_url} for {url}: {}",
        .message.as_deref().unwrap_or("unknown error")
    )]
    Http {
        status: u16,
        base_url: String,
        url: String,
        /// `message` (or `error`) field of a JSON error body, if any.
        message: Option<String>,
        /// Raw response body.
        body: String,
    },

    /// The request left the client but no response came back.
    #[error("network error contacting {base_url}: {reason}")]
    Network {
        base_url: String,
        reason: String,
        timed_out: bool,
    },

    /// The request could not be built, so nothing was sent.
    #[error("request setup failed: {0}")]
    Setup(String),

    /// A successful response carried a body of an unexpected shape.
    #[error("failed to decode response body: {0}")]
    Decode(String),

    /// The dispatcher was built without any endpoint.
    #[error("no endpoints registered")]
    NoEndpoints,
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

impl DispatchError {
    /// HTTP status, for errors that carry one.
    pub fn status(&self) -> Option<u16> {
        match self {
            DispatchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Base URL of the endpoint that produced this error, if any.
    pub fn base_url(&self) -> Option<&str> {
        match self {
            DispatchError::Http { base_url, .. } | DispatchError::Network { base_url, .. } => {
                Some(base_url)
            }
            _ => None,
        }
    }

    /// Server-provided message from an error body.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            DispatchError::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Network failures and 5xx responses may be specific to one endpoint.
    pub fn is_retryable(&self) -> bool {
        match self {
            DispatchError::Network { .. } => true,
            DispatchError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_network(&self) -> bool {
        matches!(self, DispatchError::Network { .. })
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::Http { status, .. } => match *status {
                401 => "unauthorized",
                403 => "forbidden",
                404 => "not_found",
                s if s >= 500 => "server_error",
                _ => "client_error",
            },
            DispatchError::Network { timed_out: true, .. } => "timeout",
            DispatchError::Network { .. } => "network",
            DispatchError::Setup(_) => "setup",
            DispatchError::Decode(_) => "decode",
            DispatchError::NoEndpoints => "no_endpoints",
        }
    }

    /// Generic text suitable for showing to an end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            DispatchError::Http { status, .. } => match *status {
                401 => "Your session has expired. Please sign in again.",
                403 => "You do not have permission to perform this action.",
                404 => "The requested resource was not found.",
                s if s >= 500 => "The server encountered an error. Please try again later.",
                _ => "The request was rejected by the server.",
            },
            DispatchError::Network { timed_out: true, .. } => {
                "The server did not respond in time. Please try again."
            }
            DispatchError::Network { .. } => "Unable to reach the server. Check your connection.",
            DispatchError::Setup(_) => "An error occurred while preparing the request.",
            DispatchError::Decode(_) => "The server returned an unexpected response.",
            DispatchError::NoEndpoints => "No API endpoints are configured.",
        }
    }
}
