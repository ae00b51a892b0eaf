//! Endpoint subsystem.
//!
//! # Data Flow
//! ```text
//! EndpointsConfig
//!     → registry.rs (ordered base URLs, primary first)
//!     → client.rs (one reqwest client + interceptor chain per endpoint)
//!     → Transport trait objects handed to the dispatcher
//! ```
//!
//! # Design Decisions
//! - One HTTP client per endpoint, each with its own timeout and defaults
//! - The dispatcher only sees `Transport`, so tests can script endpoints

pub mod client;
pub mod registry;

use std::fmt;

use futures_util::future::BoxFuture;

use crate::dispatch::request::{RequestContext, RequestDescriptor};
use crate::dispatch::response::ApiResponse;
use crate::error::DispatchResult;

pub use client::EndpointClient;
pub use registry::{Endpoint, EndpointRegistry};

/// Something that can carry one attempt of a request to one endpoint.
pub trait Transport: Send + Sync + fmt::Debug {
    /// Base URL this transport targets.
    fn base_url(&self) -> &str;

    /// Perform a single attempt. Never retries on its own.
    fn execute<'a>(
        &'a self,
        ctx: &'a RequestContext,
        request: &'a RequestDescriptor,
    ) -> BoxFuture<'a, DispatchResult<ApiResponse>>;
}
