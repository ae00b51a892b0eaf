//! Successful responses.

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

use crate::error::{DispatchError, DispatchResult};

/// A 2xx response from one endpoint, with the body fully read.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    /// Endpoint that produced the response.
    pub base_url: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>, base_url: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
            base_url: base_url.into(),
        }
    }

    /// Deserialize the body.
    pub fn json<T: DeserializeOwned>(&self) -> DispatchResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| DispatchError::Decode(e.to_string()))
    }

    /// Body as a JSON value. An empty body is `null`.
    pub fn data(&self) -> DispatchResult<serde_json::Value> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::Value::Null);
        }
        self.json()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
