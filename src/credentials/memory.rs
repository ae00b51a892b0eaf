//! In-memory credential store.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::credentials::{CredentialError, CredentialStore, Credentials};

/// Credentials held in process memory, swapped atomically.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: ArcSwapOption<Credentials>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `credentials`.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            inner: ArcSwapOption::from_pointee(credentials),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<Credentials>, CredentialError> {
        Ok(self.inner.load_full().map(|c| (*c).clone()))
    }

    fn set(&self, credentials: Credentials) -> Result<(), CredentialError> {
        self.inner.store(Some(Arc::new(credentials)));
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        self.inner.store(None);
        Ok(())
    }
}
