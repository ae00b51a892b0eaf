//! Shared utilities for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use api_dispatcher::credentials::CredentialError;
use api_dispatcher::endpoint::EndpointRegistry;
use api_dispatcher::{CredentialStore, Credentials, FailoverDispatcher, MemoryCredentialStore};
use tokio::net::TcpListener;

/// Base URL of a port that nothing listens on.
#[allow(dead_code)]
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Dispatcher over `base_urls` (in order) with the standard interceptors.
#[allow(dead_code)]
pub fn dispatcher(
    base_urls: &[String],
    store: Arc<dyn CredentialStore>,
    timeout: Duration,
) -> FailoverDispatcher {
    let registry = EndpointRegistry::new(base_urls[0].clone(), base_urls[1..].iter().cloned());
    FailoverDispatcher::from_registry(&registry, timeout, store, true).unwrap()
}

/// Memory store that counts `clear` calls.
#[derive(Debug, Default)]
pub struct CountingStore {
    inner: MemoryCredentialStore,
    clears: AtomicUsize,
}

#[allow(dead_code)]
impl CountingStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            inner: MemoryCredentialStore::with_credentials(
                Credentials::new(token).with_user(serde_json::json!({"id": 1, "role": "admin"})),
            ),
            clears: AtomicUsize::new(0),
        }
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl CredentialStore for CountingStore {
    fn get(&self) -> Result<Option<Credentials>, CredentialError> {
        self.inner.get()
    }

    fn set(&self, credentials: Credentials) -> Result<(), CredentialError> {
        self.inner.set(credentials)
    }

    fn clear(&self) -> Result<(), CredentialError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear()
    }
}
