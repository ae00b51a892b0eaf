//! Bearer token injection.

use std::sync::Arc;

use crate::credentials::CredentialStore;
use crate::dispatch::request::{RequestContext, RequestDescriptor};
use crate::error::DispatchResult;
use crate::interceptor::Interceptor;

const TOKEN_PREVIEW_CHARS: usize = 10;
const AUTHORIZATION: &str = "Authorization";

/// Attaches `Authorization: Bearer <token>` when a token is stored.
///
/// A missing token never blocks the request: the server decides whether the
/// call needs authentication.
#[derive(Debug)]
pub struct AuthInterceptor {
    store: Arc<dyn CredentialStore>,
    dev_logging: bool,
}

impl AuthInterceptor {
    pub fn new(store: Arc<dyn CredentialStore>, dev_logging: bool) -> Self {
        Self { store, dev_logging }
    }
}

impl Interceptor for AuthInterceptor {
    fn on_request(&self, ctx: &RequestContext, request: &mut RequestDescriptor) -> DispatchResult<()> {
        let token = match self.store.token() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(
                    request_id = %ctx.request_id,
                    error = %e,
                    "Failed to read credential store, sending request without token"
                );
                None
            }
        };

        match &token {
            Some(token) => {
                // Header names are case-insensitive on the wire.
                request
                    .headers
                    .retain(|name, _| !name.eq_ignore_ascii_case(AUTHORIZATION));
                request
                    .headers
                    .insert(AUTHORIZATION.to_string(), format!("Bearer {token}"));
            }
            None if request.method.is_state_mutating() => {
                tracing::warn!(
                    request_id = %ctx.request_id,
                    method = %request.method,
                    url = %request.url,
                    "Authentication required but no token is stored; sending request anyway"
                );
            }
            None => {}
        }

        if self.dev_logging {
            let body = request
                .data
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            tracing::debug!(
                request_id = %ctx.request_id,
                attempt = ctx.attempt,
                method = %request.method,
                url = %request.url,
                base_url = %ctx.base_url,
                has_token = token.is_some(),
                token_preview = %token.as_deref().map(token_preview).unwrap_or_default(),
                body = %body,
                params = ?request.params,
                "Outgoing request"
            );
        }

        Ok(())
    }
}

/// First few characters of a token, for diagnostics.
fn token_preview(token: &str) -> String {
    let head: String = token.chars().take(TOKEN_PREVIEW_CHARS).collect();
    format!("{head}...")
}
