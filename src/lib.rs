//! Failover-aware HTTP dispatcher for the recruitment admin API.
//!
//! # Architecture Overview
//!
//! ```text
//!   caller ── get/post/put/patch/delete ──▶ FailoverDispatcher
//!                                               │  (registry order)
//!                   ┌───────────────────────────┼───────────────────────────┐
//!                   ▼                           ▼                           ▼
//!            EndpointClient #0           EndpointClient #1          EndpointClient #N
//!            ┌──────────────┐            ┌──────────────┐           ┌──────────────┐
//!            │ interceptors │            │ interceptors │           │ interceptors │
//!            │ auth / error │            │ auth / error │           │ auth / error │
//!            └──────┬───────┘            └──────┬───────┘           └──────┬───────┘
//!                   ▼                           ▼                          ▼
//!               primary API               secondary API                   ...
//!
//!   CredentialStore (token + user) ◀── read by auth, cleared on 401
//! ```
//!
//! A call goes to the primary first. Network failures and 5xx move it to the
//! next endpoint; anything else ends it.

pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod interceptor;
pub mod observability;

pub use config::DispatcherConfig;
pub use credentials::{CredentialStore, Credentials, FileCredentialStore, MemoryCredentialStore};
pub use dispatch::{ApiResponse, FailoverDispatcher, Method, RequestDescriptor, RequestOptions};
pub use error::{DispatchError, DispatchResult};
