//! Failover dispatcher.
//!
//! # State Machine (per logical call)
//! ```text
//! ATTEMPTING(i) → success                      → SUCCEEDED (return response)
//! ATTEMPTING(i) → network / 5xx, i+1 < N       → ATTEMPTING(i+1)
//! ATTEMPTING(i) → network / 5xx, i+1 == N      → FAILED (this error)
//! ATTEMPTING(i) → 4xx / setup error            → FAILED (this error)
//! ```
//!
//! Attempts are strictly sequential and always in registry order. Errors from
//! earlier attempts are discarded; the caller sees the last one.

use std::sync::Arc;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::config::DispatcherConfig;
use crate::credentials::CredentialStore;
use crate::dispatch::policy::{self, Step};
use crate::dispatch::request::{Method, RequestContext, RequestDescriptor, RequestOptions};
use crate::dispatch::response::ApiResponse;
use crate::endpoint::{EndpointClient, EndpointRegistry, Transport};
use crate::error::{DispatchError, DispatchResult};
use crate::interceptor::InterceptorChain;
use crate::observability::metrics;

/// Sends each logical request to the first endpoint that can serve it.
#[derive(Debug, Clone)]
pub struct FailoverDispatcher {
    /// Transports in priority order (primary first).
    transports: Vec<Arc<dyn Transport>>,
    /// Optional cap on attempts per call.
    max_attempts: Option<usize>,
}

impl FailoverDispatcher {
    /// Create a dispatcher over `transports`, tried in the given order.
    pub fn new(transports: Vec<Arc<dyn Transport>>) -> DispatchResult<Self> {
        if transports.is_empty() {
            return Err(DispatchError::NoEndpoints);
        }
        Ok(Self {
            transports,
            max_attempts: None,
        })
    }

    /// Build one `EndpointClient` per registered endpoint, each with its own
    /// interceptor pair bound to `store`.
    pub fn from_registry(
        registry: &EndpointRegistry,
        timeout: Duration,
        store: Arc<dyn CredentialStore>,
        dev_logging: bool,
    ) -> DispatchResult<Self> {
        let transports = registry
            .iter()
            .map(|endpoint| {
                let interceptors = InterceptorChain::standard(store.clone(), dev_logging);
                EndpointClient::new(endpoint.clone(), timeout, interceptors)
                    .map(|client| Arc::new(client) as Arc<dyn Transport>)
            })
            .collect::<DispatchResult<Vec<_>>>()?;

        tracing::info!(
            endpoints = registry.len(),
            primary = %registry.primary().base_url(),
            timeout_secs = timeout.as_secs(),
            "Dispatcher initialized"
        );

        Self::new(transports)
    }

    /// Build from a validated configuration.
    pub fn from_config(config: &DispatcherConfig, store: Arc<dyn CredentialStore>) -> DispatchResult<Self> {
        let registry = EndpointRegistry::from_config(&config.endpoints);
        let dispatcher = Self::from_registry(
            &registry,
            Duration::from_secs(config.timeouts.request_secs),
            store,
            config.observability.dev_logging,
        )?;
        Ok(dispatcher.with_max_attempts(config.dispatch.max_attempts))
    }

    /// Cap the number of endpoints tried per call. The primary is always tried.
    pub fn with_max_attempts(mut self, max_attempts: Option<usize>) -> Self {
        self.max_attempts = max_attempts.map(|max| max.max(1));
        self
    }

    /// Base URLs in the order they are tried.
    pub fn endpoints(&self) -> Vec<&str> {
        self.transports.iter().map(|t| t.base_url()).collect()
    }

    /// Attempts a single call may make.
    pub fn attempt_budget(&self) -> usize {
        policy::effective_attempts(self.transports.len(), self.max_attempts)
    }

    /// Dispatch one logical request across the endpoints.
    pub async fn request(&self, descriptor: RequestDescriptor) -> DispatchResult<ApiResponse> {
        let request_id = Uuid::new_v4();
        let start = Instant::now();
        let attempts = self.attempt_budget();

        for (index, transport) in self.transports.iter().take(attempts).enumerate() {
            let ctx = RequestContext {
                request_id,
                attempt: index + 1,
                base_url: transport.base_url().to_string(),
            };
            metrics::record_attempt(&ctx.base_url);

            match transport.execute(&ctx, &descriptor).await {
                Ok(response) => {
                    if index > 0 {
                        tracing::info!(
                            %request_id,
                            attempt = ctx.attempt,
                            base_url = %ctx.base_url,
                            "Request served by fallback endpoint"
                        );
                    }
                    metrics::record_request(descriptor.method.as_str(), "success", start);
                    return Ok(response);
                }
                Err(error) => match policy::next_step(index, attempts, &error) {
                    Step::Failover => {
                        tracing::warn!(
                            %request_id,
                            attempt = ctx.attempt,
                            base_url = %ctx.base_url,
                            error = %error,
                            "Endpoint failed, trying next endpoint"
                        );
                        metrics::record_failover(policy::failover_reason(&error));
                    }
                    Step::Fail => {
                        tracing::debug!(
                            %request_id,
                            attempts = ctx.attempt,
                            kind = error.kind(),
                            "Request failed"
                        );
                        metrics::record_request(descriptor.method.as_str(), error.kind(), start);
                        return Err(error);
                    }
                },
            }
        }

        // `new` rejects an empty transport list and `next_step` never fails
        // over past the last attempt, so the loop always returns.
        Err(DispatchError::NoEndpoints)
    }

    pub async fn get(&self, url: &str, options: RequestOptions) -> DispatchResult<ApiResponse> {
        self.request(options.into_descriptor(Method::Get, url)).await
    }

    pub async fn delete(&self, url: &str, options: RequestOptions) -> DispatchResult<ApiResponse> {
        self.request(options.into_descriptor(Method::Delete, url)).await
    }

    pub async fn post(
        &self,
        url: &str,
        data: serde_json::Value,
        options: RequestOptions,
    ) -> DispatchResult<ApiResponse> {
        self.request(options.data(data).into_descriptor(Method::Post, url)).await
    }

    pub async fn put(
        &self,
        url: &str,
        data: serde_json::Value,
        options: RequestOptions,
    ) -> DispatchResult<ApiResponse> {
        self.request(options.data(data).into_descriptor(Method::Put, url)).await
    }

    pub async fn patch(
        &self,
        url: &str,
        data: serde_json::Value,
        options: RequestOptions,
    ) -> DispatchResult<ApiResponse> {
        self.request(options.data(data).into_descriptor(Method::Patch, url)).await
    }
}
