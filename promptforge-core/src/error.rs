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

//! Error taxonomy shared by every layer above persistence.
//!
//! Each variant corresponds to exactly one row of the error table in the
//! specification; the HTTP boundary (`promptforge-server`) maps these to a
//! numeric code and status, the same split the teacher draws between
//! `agentreplay-server::auth::AuthError` (typed, local) and its
//! `IntoResponse` impl (boundary).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("cycle detected: {0}")]
    CycleDetected(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("template render failed: {0}")]
    TemplateRender(#[from] TemplateError),
}

/// Sub-taxonomy for the Template Renderer, folded into
/// `CoreError::TemplateRender` at the boundary but kept distinct internally
/// since callers (the Scene Resolution Engine) branch on the reason.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TemplateError {
    #[error("missing required variables: {0:?}")]
    VariablesMissing(Vec<String>),

    #[error("invalid variable '{name}': {detail}")]
    VariableInvalid { name: String, detail: String },

    #[error("undefined variable referenced: {0}")]
    Undefined(String),

    #[error("template syntax error: {0}")]
    Syntax(String),

    #[error("unsafe template operation blocked: {0}")]
    Unsafe(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
