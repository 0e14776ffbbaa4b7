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

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use promptforge_core::{PromptId, PromptRef, PromptRefId, VarMap};
use promptforge_engine::prompt_ops;

use crate::api::envelope::ApiResponse;
use crate::api::AppState;
use crate::error::ApiError;

fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, ApiError> {
    T::from_str(raw).map_err(|_| ApiError::Validation(format!("invalid {what} id")))
}

#[derive(Debug, Deserialize)]
pub struct CreateRefRequest {
    pub source_id: String,
    pub target_id: String,
    pub ref_type: String,
    #[serde(default)]
    pub override_config: Option<VarMap>,
}

#[derive(Debug, Serialize)]
pub struct RefsResponse {
    pub outgoing: Vec<PromptRef>,
    pub incoming: Vec<PromptRef>,
}

pub async fn list_refs(
    State(state): State<AppState>,
    Path(prompt_id): Path<String>,
) -> Result<Json<ApiResponse<RefsResponse>>, ApiError> {
    let id: PromptId = parse_id(&prompt_id, "prompt")?;
    let (outgoing, incoming) = prompt_ops::list_refs_for_prompt(state.store.as_ref(), id).await?;
    Ok(Json(ApiResponse::ok(RefsResponse { outgoing, incoming })))
}

pub async fn create_ref(
    State(state): State<AppState>,
    Json(req): Json<CreateRefRequest>,
) -> Result<Json<ApiResponse<PromptRef>>, ApiError> {
    let source_id: PromptId = parse_id(&req.source_id, "source prompt")?;
    let target_id: PromptId = parse_id(&req.target_id, "target prompt")?;
    let created = prompt_ops::create_ref(
        state.store.as_ref(),
        source_id,
        target_id,
        req.ref_type,
        req.override_config,
        None,
    )
    .await?;
    Ok(Json(ApiResponse::ok(created)))
}

pub async fn delete_ref(
    State(state): State<AppState>,
    Path(ref_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id: PromptRefId = parse_id(&ref_id, "ref")?;
    prompt_ops::delete_ref(state.store.as_ref(), id).await?;
    Ok(Json(ApiResponse::ok(())))
}
