//! Request descriptors.
//!
//! A [`RequestDescriptor`] is created once per logical call and shared,
//! read-only, by every attempt of that call. Interceptors work on a per-attempt
//! copy.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DispatchError, DispatchResult};

/// HTTP methods the dispatcher issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// POST/PUT/PATCH/DELETE change server state and normally need a token.
    pub fn is_state_mutating(&self) -> bool {
        !matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One logical request, independent of the endpoint it is sent to.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path relative to the endpoint base URL (e.g. `/user/1`).
    pub url: String,
    /// JSON body.
    pub data: Option<serde_json::Value>,
    /// Query parameters, in order.
    pub params: Vec<(String, String)>,
    /// Per-call header overrides.
    pub headers: BTreeMap<String, String>,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            data: None,
            params: Vec::new(),
            headers: BTreeMap::new(),
        }
    }
}

/// Optional parts of a request, as passed to the convenience methods.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub data: Option<serde_json::Value>,
    pub params: Vec<(String, String)>,
    pub headers: BTreeMap<String, String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Serialize `body` as the JSON payload.
    pub fn json_body<T: Serialize + ?Sized>(self, body: &T) -> DispatchResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| DispatchError::Setup(format!("failed to serialize request body: {e}")))?;
        Ok(self.data(value))
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Combine with a method and path into a full descriptor.
    pub fn into_descriptor(self, method: Method, url: impl Into<String>) -> RequestDescriptor {
        RequestDescriptor {
            method,
            url: url.into(),
            data: self.data,
            params: self.params,
            headers: self.headers,
        }
    }
}

/// Identity of a single attempt within a logical call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Shared by all attempts of one logical call.
    pub request_id: Uuid,
    /// 1-based attempt number.
    pub attempt: usize,
    /// Base URL of the endpoint this attempt targets.
    pub base_url: String,
}
