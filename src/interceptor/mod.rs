//! Interceptor layer.
//!
//! # Data Flow
//! ```text
//! EndpointClient::send
//!     → on_request  (auth.rs: bearer token, missing-token warning, dev logging)
//!     → HTTP exchange with one endpoint
//!     → on_response (response.rs: dev logging)
//!       or on_error (response.rs: 401 clears credentials, per-status logging)
//!     → original result returned unchanged
//! ```
//!
//! # Design Decisions
//! - Each endpoint client owns its own chain; nothing is shared between them
//!   except the credential store
//! - Interceptors observe errors but never swallow or replace them

pub mod auth;
pub mod response;

use std::fmt;
use std::sync::Arc;

use crate::credentials::CredentialStore;
use crate::dispatch::request::{RequestContext, RequestDescriptor};
use crate::dispatch::response::ApiResponse;
use crate::error::{DispatchError, DispatchResult};

pub use auth::AuthInterceptor;
pub use response::ErrorInterceptor;

/// Hook run around every attempt of a per-endpoint client.
pub trait Interceptor: Send + Sync + fmt::Debug {
    /// Runs before send. Returning an error aborts the attempt as a setup failure.
    fn on_request(&self, _ctx: &RequestContext, _request: &mut RequestDescriptor) -> DispatchResult<()> {
        Ok(())
    }

    /// Runs after a 2xx response.
    fn on_response(&self, _ctx: &RequestContext, _request: &RequestDescriptor, _response: &ApiResponse) {}

    /// Runs after any failure of the attempt.
    fn on_error(&self, _ctx: &RequestContext, _request: &RequestDescriptor, _error: &DispatchError) {}
}

/// Ordered interceptors belonging to one endpoint client.
#[derive(Debug, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Box<dyn Interceptor>>,
}

impl InterceptorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard request/response pair bound to `store`.
    pub fn standard(store: Arc<dyn CredentialStore>, dev_logging: bool) -> Self {
        Self::new()
            .with(AuthInterceptor::new(store.clone(), dev_logging))
            .with(ErrorInterceptor::new(store, dev_logging))
    }

    pub fn with(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Box::new(interceptor));
        self
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    pub fn before_send(&self, ctx: &RequestContext, request: &mut RequestDescriptor) -> DispatchResult<()> {
        for interceptor in &self.interceptors {
            interceptor.on_request(ctx, request)?;
        }
        Ok(())
    }

    pub fn after_response(&self, ctx: &RequestContext, request: &RequestDescriptor, response: &ApiResponse) {
        for interceptor in &self.interceptors {
            interceptor.on_response(ctx, request, response);
        }
    }

    pub fn after_error(&self, ctx: &RequestContext, request: &RequestDescriptor, error: &DispatchError) {
        for interceptor in &self.interceptors {
            interceptor.on_error(ctx, request, error);
        }
    }
}
