//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! dispatcher + interceptors produce:
//!     → logging.rs (structured log events, request_id on every line)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stderr (pretty or JSON)
//!     → whichever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Request ID is generated per logical call and shared by its attempts
//! - Request/response bodies are only logged with `dev_logging` on

pub mod logging;
pub mod metrics;
