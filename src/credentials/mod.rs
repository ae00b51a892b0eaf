//! Credential state shared by the interceptors.
//!
//! # Data Flow
//! ```text
//! login (CLI / host app)  → store.set(token, user)
//! request interceptor     → store.get() → Authorization: Bearer <token>
//! response interceptor    → 401 → store.clear()
//! logout                  → store.clear()
//! ```
//!
//! # Design Decisions
//! - Storage is behind the `CredentialStore` trait so tests use memory
//! - No transaction discipline: concurrent clears may race, which is harmless
//! - Token and user record live under the fixed keys `token` and `user`

pub mod file;
pub mod memory;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

/// Bearer token plus the user record returned at login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
}

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user: None,
        }
    }

    pub fn with_user(mut self, user: serde_json::Value) -> Self {
        self.user = Some(user);
        self
    }
}

/// Errors raised by a credential store backend.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("credential store contains invalid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Persistent key-value store for the bearer token and user record.
pub trait CredentialStore: Send + Sync + fmt::Debug {
    /// Current credentials, if a login has been recorded.
    fn get(&self) -> Result<Option<Credentials>, CredentialError>;

    /// Replace the stored credentials.
    fn set(&self, credentials: Credentials) -> Result<(), CredentialError>;

    /// Remove both the token and the user record.
    fn clear(&self) -> Result<(), CredentialError>;

    /// Bearer token only. Empty tokens count as absent.
    fn token(&self) -> Result<Option<String>, CredentialError> {
        Ok(self
            .get()?
            .map(|c| c.token)
            .filter(|token| !token.is_empty()))
    }
}
