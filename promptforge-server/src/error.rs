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

//! The HTTP boundary's error type. Everything below this layer speaks
//! [`promptforge_core::CoreError`] or [`promptforge_engine::EngineError`];
//! this is where those get a numeric code, a status, and an envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use promptforge_core::{CoreError, TemplateError};
use promptforge_engine::EngineError;
use promptforge_storage::StorageError;

use crate::api::envelope::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing or invalid bearer token")]
    AuthRequired,

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
    TemplateRender(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// One row of the §7 taxonomy: numeric code plus the HTTP status it maps to.
impl ApiError {
    fn code_and_status(&self) -> (i32, StatusCode) {
        match self {
            ApiError::AuthRequired => (40100, StatusCode::UNAUTHORIZED),
            ApiError::PermissionDenied(_) => (40300, StatusCode::FORBIDDEN),
            ApiError::NotFound(_) => (40400, StatusCode::NOT_FOUND),
            ApiError::Conflict(_) => (40900, StatusCode::CONFLICT),
            ApiError::CycleDetected(_) => (40901, StatusCode::CONFLICT),
            ApiError::Validation(_) => (42200, StatusCode::UNPROCESSABLE_ENTITY),
            ApiError::TemplateRender(_) => (42201, StatusCode::UNPROCESSABLE_ENTITY),
            ApiError::Internal(_) => (50000, StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, status) = self.code_and_status();
        let body = ApiResponse {
            code,
            message: self.to_string(),
            data: serde_json::Value::Null,
            meta: None,
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(msg) => ApiError::NotFound(msg),
            CoreError::Conflict(msg) => ApiError::Conflict(msg),
            CoreError::PermissionDenied(msg) => ApiError::PermissionDenied(msg),
            CoreError::CycleDetected(msg) => ApiError::CycleDetected(msg),
            CoreError::Validation(msg) => ApiError::Validation(msg),
            CoreError::TemplateRender(e) => ApiError::TemplateRender(e.to_string()),
        }
    }
}

impl From<TemplateError> for ApiError {
    fn from(err: TemplateError) -> Self {
        ApiError::TemplateRender(err.to_string())
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        CoreError::from(err).into()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        CoreError::from(err).into()
    }
}
