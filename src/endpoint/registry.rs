//! Endpoint registry.
//!
//! # Responsibilities
//! - Hold the ordered list of API base URLs, primary first
//! - Stay frozen for the lifetime of the process
//!
//! URLs are stored as given. No dedup and no well-formedness check: a bad
//! URL fails as a connection error when a request is attempted against it.

use serde::Serialize;

use crate::config::EndpointsConfig;

/// One backend base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    base_url: String,
}

impl Endpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Ordered, immutable list of endpoints. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointRegistry {
    endpoints: Vec<Endpoint>,
}

impl EndpointRegistry {
    /// Build from a primary URL followed by secondaries, in priority order.
    pub fn new<I, S>(primary: impl Into<String>, secondaries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut endpoints = vec![Endpoint::new(primary)];
        endpoints.extend(secondaries.into_iter().map(Endpoint::new));
        Self { endpoints }
    }

    pub fn from_config(config: &EndpointsConfig) -> Self {
        Self::new(config.primary.clone(), config.secondaries.iter().cloned())
    }

    pub fn primary(&self) -> &Endpoint {
        &self.endpoints[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
