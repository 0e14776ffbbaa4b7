// Copyright 2026 PromptForge Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Pluggable request authentication. The prompt-management surface doesn't
//! model end users or sessions itself — it authenticates the calling
//! system with one of a small set of static bearer tokens and hands the
//! handler an opaque [`AuthContext`].

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::api::AppState;
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct AuthContext {
    pub token: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing authentication credentials")]
    MissingCredentials,

    #[error("invalid authentication credentials")]
    InvalidCredentials,
}

/// Both variants are AUTH_REQUIRED (§7, code 40100) — the taxonomy doesn't
/// distinguish missing vs. malformed credentials, only whether auth passed.
impl From<AuthError> for ApiError {
    fn from(_: AuthError) -> Self {
        ApiError::AuthRequired
    }
}

pub trait Authenticator: Send + Sync {
    fn authenticate(&self, headers: &HeaderMap) -> Result<AuthContext, AuthError>;
}

/// Accepts every request, stamping an empty [`AuthContext`]. Used when the
/// deployment has no configured tokens — local development and tests.
pub struct NoAuth;

impl Authenticator for NoAuth {
    fn authenticate(&self, _headers: &HeaderMap) -> Result<AuthContext, AuthError> {
        Ok(AuthContext { token: None })
    }
}

/// Checks `Authorization: Bearer <token>` against a fixed allow-list.
pub struct StaticTokenAuth {
    tokens: Vec<String>,
}

impl StaticTokenAuth {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }
}

impl Authenticator for StaticTokenAuth {
    fn authenticate(&self, headers: &HeaderMap) -> Result<AuthContext, AuthError> {
        let header_value = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingCredentials)?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidCredentials)?;

        if self.tokens.iter().any(|t| t == token) {
            Ok(AuthContext {
                token: Some(token.to_string()),
            })
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Runs before every handler: authenticates via `state.authenticator` and
/// attaches the resulting [`AuthContext`] as a request extension.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx = state.authenticator.authenticate(request.headers())?;
    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}
