//! Response normalization: per-status logging and credential reset on 401.

use std::sync::Arc;

use crate::credentials::CredentialStore;
use crate::dispatch::request::{RequestContext, RequestDescriptor};
use crate::dispatch::response::ApiResponse;
use crate::error::DispatchError;
use crate::interceptor::Interceptor;

/// Logs failures by kind and clears stored credentials on 401.
///
/// Navigation to a login flow is left to the caller.
#[derive(Debug)]
pub struct ErrorInterceptor {
    store: Arc<dyn CredentialStore>,
    dev_logging: bool,
}

impl ErrorInterceptor {
    pub fn new(store: Arc<dyn CredentialStore>, dev_logging: bool) -> Self {
        Self { store, dev_logging }
    }
}

impl Interceptor for ErrorInterceptor {
    fn on_response(&self, ctx: &RequestContext, request: &RequestDescriptor, response: &ApiResponse) {
        if self.dev_logging {
            tracing::debug!(
                request_id = %ctx.request_id,
                status = response.status,
                url = %request.url,
                base_url = %ctx.base_url,
                body = %response.text(),
                "Response received"
            );
        }
    }

    fn on_error(&self, ctx: &RequestContext, request: &RequestDescriptor, error: &DispatchError) {
        let request_id = ctx.request_id;
        let base_url = ctx.base_url.as_str();
        let url = request.url.as_str();

        match error {
            DispatchError::Http { status: 401, .. } => {
                tracing::warn!(%request_id, %base_url, %url, "Unauthorized, clearing stored credentials");
                if let Err(e) = self.store.clear() {
                    tracing::error!(%request_id, error = %e, "Failed to clear stored credentials");
                }
            }
            DispatchError::Http { status: 403, message, .. } => {
                tracing::error!(
                    %request_id,
                    %base_url,
                    %url,
                    method = %request.method,
                    server_message = message.as_deref().unwrap_or("no details provided"),
                    "Access denied: the current account lacks permission for this resource"
                );
            }
            DispatchError::Http { status: 404, .. } => {
                tracing::warn!(%request_id, %base_url, %url, "Resource not found");
            }
            DispatchError::Http { status: 500, .. } => {
                tracing::error!(%request_id, %base_url, %url, "Internal server error");
            }
            DispatchError::Http { status, message, .. } => {
                tracing::error!(
                    %request_id,
                    %base_url,
                    %url,
                    status,
                    server_message = message.as_deref().unwrap_or("unknown error"),
                    "Request failed"
                );
            }
            DispatchError::Network { reason, timed_out, .. } => {
                tracing::error!(
                    %request_id,
                    %base_url,
                    %url,
                    timed_out,
                    reason = %reason,
                    "No response received from endpoint"
                );
            }
            DispatchError::Setup(reason) => {
                tracing::error!(%request_id, %url, reason = %reason, "Request setup failed before sending");
            }
            other => {
                tracing::error!(%request_id, %url, error = %other, "Request failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{Credentials, MemoryCredentialStore};
    use crate::dispatch::request::Method;
    use crate::observability::logging::capture::logs_of;
    use uuid::Uuid;

    fn ctx() -> RequestContext {
        RequestContext {
            request_id: Uuid::new_v4(),
            attempt: 1,
            base_url: "http://a".into(),
        }
    }

    fn http(status: u16) -> DispatchError {
        DispatchError::Http {
            status,
            base_url: "http://a".into(),
            url: "/user".into(),
            message: None,
            body: String::new(),
        }
    }

    #[test]
    fn test_401_clears_credentials() {
        let store = Arc::new(MemoryCredentialStore::with_credentials(Credentials::new("t")));
        let interceptor = ErrorInterceptor::new(store.clone(), false);
        let request = RequestDescriptor::new(Method::Get, "/user");

        interceptor.on_error(&ctx(), &request, &http(401));
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_other_errors_keep_credentials() {
        let store = Arc::new(MemoryCredentialStore::with_credentials(Credentials::new("t")));
        let interceptor = ErrorInterceptor::new(store.clone(), true);
        let request = RequestDescriptor::new(Method::Get, "/user");

        for status in [400, 403, 404, 500, 503] {
            interceptor.on_error(&ctx(), &request, &http(status));
        }
        interceptor.on_response(&ctx(), &request, &ApiResponse::new(200, b"{}".to_vec(), "http://a"));
        assert_eq!(store.token().unwrap().as_deref(), Some("t"));
    }

    #[test]
    fn test_each_failure_kind_logs_its_own_line() {
        let interceptor = ErrorInterceptor::new(Arc::new(MemoryCredentialStore::new()), false);
        let request = RequestDescriptor::new(Method::Delete, "/companies/9");

        let forbidden = DispatchError::Http {
            status: 403,
            base_url: "http://a".into(),
            url: "/companies/9".into(),
            message: Some("Super admin role required".into()),
            body: String::new(),
        };
        let network = DispatchError::Network {
            base_url: "http://a".into(),
            reason: "connection refused".into(),
            timed_out: false,
        };

        let cases: Vec<(DispatchError, &str, &str)> = vec![
            (http(401), "WARN", "Unauthorized, clearing stored credentials"),
            (forbidden, "ERROR", "Super admin role required"),
            (http(404), "WARN", "Resource not found"),
            (http(500), "ERROR", "Internal server error"),
            (http(418), "ERROR", "unknown error"),
            (network, "ERROR", "No response received from endpoint"),
            (DispatchError::Setup("bad header".into()), "ERROR", "Request setup failed"),
        ];

        for (error, level, expected) in cases {
            let logs = logs_of(|| interceptor.on_error(&ctx(), &request, &error));
            assert!(logs.contains(level), "{error}: {logs}");
            assert!(logs.contains(expected), "{error}: {logs}");
        }

        let logs = logs_of(|| interceptor.on_error(&ctx(), &request, &http(403)));
        assert!(logs.contains("Access denied"), "{logs}");
        assert!(!logs.contains("Internal server error"), "{logs}");
    }
}
