//! Per-endpoint HTTP client.
//!
//! # Responsibilities
//! - Perform one request against one fixed base URL
//! - Apply shared defaults (timeout, JSON content type)
//! - Run this endpoint's interceptor chain around every attempt
//! - Turn transport outcomes into `ApiResponse` or a typed `DispatchError`

use std::error::Error as StdError;
use std::time::Duration;

use futures_util::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use url::Url;

use crate::dispatch::request::{RequestContext, RequestDescriptor};
use crate::dispatch::response::ApiResponse;
use crate::endpoint::{Endpoint, Transport};
use crate::error::{DispatchError, DispatchResult};
use crate::interceptor::InterceptorChain;

/// Header carrying the logical call's ID on every attempt.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP client bound to a single endpoint.
#[derive(Debug)]
pub struct EndpointClient {
    endpoint: Endpoint,
    http: reqwest::Client,
    interceptors: InterceptorChain,
    timeout: Duration,
}

impl EndpointClient {
    /// Create a client for `endpoint` with its own interceptor chain.
    pub fn new(
        endpoint: Endpoint,
        timeout: Duration,
        interceptors: InterceptorChain,
    ) -> DispatchResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|e| DispatchError::Setup(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint,
            http,
            interceptors,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL for `request` on this endpoint, query string included.
    ///
    /// An unparseable result is reported as a connection failure, the same
    /// way an unreachable host would be.
    pub fn resolve_url(&self, request: &RequestDescriptor) -> DispatchResult<Url> {
        let raw = if request.url.starts_with("http://") || request.url.starts_with("https://") {
            request.url.clone()
        } else {
            join_url(self.endpoint.base_url(), &request.url)
        };

        let mut url = Url::parse(&raw).map_err(|e| DispatchError::Network {
            base_url: self.endpoint.base_url().to_string(),
            reason: format!("invalid endpoint URL '{raw}': {e}"),
            timed_out: false,
        })?;

        if !request.params.is_empty() {
            url.query_pairs_mut().extend_pairs(request.params.iter());
        }
        Ok(url)
    }

    fn build_request(
        &self,
        ctx: &RequestContext,
        request: &RequestDescriptor,
    ) -> DispatchResult<reqwest::Request> {
        let url = self.resolve_url(request)?;

        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| DispatchError::Setup(format!("invalid header name '{name}': {e}")))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| DispatchError::Setup(format!("invalid value for header '{name}': {e}")))?;
            headers.insert(header_name, header_value);
        }
        let request_id = HeaderValue::from_str(&ctx.request_id.to_string())
            .map_err(|e| DispatchError::Setup(format!("invalid request id: {e}")))?;
        headers.insert(REQUEST_ID_HEADER, request_id);

        let mut builder = self
            .http
            .request(request.method.into(), url)
            .headers(headers);
        if let Some(data) = &request.data {
            builder = builder.json(data);
        }

        builder
            .build()
            .map_err(|e| DispatchError::Setup(format!("failed to build request: {e}")))
    }

    async fn perform(
        &self,
        ctx: &RequestContext,
        request: &RequestDescriptor,
    ) -> DispatchResult<ApiResponse> {
        let prepared = self.build_request(ctx, request)?;

        let response = self
            .http
            .execute(prepared)
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => return Err(self.unreadable_body(status, &request.url, self.classify(e))),
        };

        if status.is_success() {
            return Ok(ApiResponse {
                status: status.as_u16(),
                headers,
                body,
                base_url: self.endpoint.base_url().to_string(),
            });
        }

        Err(DispatchError::Http {
            status: status.as_u16(),
            base_url: self.endpoint.base_url().to_string(),
            url: request.url.clone(),
            message: extract_message(&body),
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }

    async fn send(
        &self,
        ctx: &RequestContext,
        request: &RequestDescriptor,
    ) -> DispatchResult<ApiResponse> {
        let mut outgoing = request.clone();

        let result = match self.interceptors.before_send(ctx, &mut outgoing) {
            Ok(()) => self.perform(ctx, &outgoing).await,
            Err(e) => Err(e),
        };

        match &result {
            Ok(response) => self.interceptors.after_response(ctx, &outgoing, response),
            Err(error) => self.interceptors.after_error(ctx, &outgoing, error),
        }
        result
    }

    /// Body read failed after the status line arrived. A 4xx status already
    /// decides the outcome, so it is kept instead of the transport failure.
    fn unreadable_body(&self, status: StatusCode, url: &str, cause: DispatchError) -> DispatchError {
        if !status.is_client_error() {
            return cause;
        }
        tracing::debug!(status = status.as_u16(), error = %cause, "Discarding unreadable error body");
        DispatchError::Http {
            status: status.as_u16(),
            base_url: self.endpoint.base_url().to_string(),
            url: url.to_string(),
            message: None,
            body: String::new(),
        }
    }

    /// Map a reqwest failure onto the dispatch taxonomy.
    fn classify(&self, error: reqwest::Error) -> DispatchError {
        if error.is_builder() {
            return DispatchError::Setup(error_chain(&error));
        }
        DispatchError::Network {
            base_url: self.endpoint.base_url().to_string(),
            reason: error_chain(&error),
            timed_out: error.is_timeout(),
        }
    }
}

impl Transport for EndpointClient {
    fn base_url(&self) -> &str {
        self.endpoint.base_url()
    }

    fn execute<'a>(
        &'a self,
        ctx: &'a RequestContext,
        request: &'a RequestDescriptor,
    ) -> BoxFuture<'a, DispatchResult<ApiResponse>> {
        Box::pin(self.send(ctx, request))
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

/// `message` (or `error`) string from a JSON error body.
fn extract_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

fn error_chain(error: &dyn StdError) -> String {
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        out.push_str(": ");
        out.push_str(&inner.to_string());
        source = inner.source();
    }
    out
}
