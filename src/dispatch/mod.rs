//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! caller → get/post/put/patch/delete
//!     → request.rs (RequestDescriptor built once per call)
//!     → dispatcher.rs (iterate endpoints in registry order)
//!         → endpoint transport (interceptors + HTTP exchange)
//!         → policy.rs (fail over or stop)
//!     → response.rs (first success) or last error
//! ```
//!
//! # Design Decisions
//! - Sequential attempts only; endpoints are never raced
//! - No memory across calls: every call starts at the primary
//! - No overall deadline; each endpoint enforces its own timeout

pub mod dispatcher;
pub mod policy;
pub mod request;
pub mod response;

pub use dispatcher::FailoverDispatcher;
pub use request::{Method, RequestContext, RequestDescriptor, RequestOptions};
pub use response::ApiResponse;
