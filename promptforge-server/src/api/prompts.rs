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

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use promptforge_core::{Prompt, PromptId, PromptVersion, ProjectId, Scene, VarMap, VariableDef, VersionBump};
use promptforge_engine::{prompt_ops, version as engine_version};

use crate::api::envelope::{paginate, ApiResponse, ListParams};
use crate::api::AppState;
use crate::error::ApiError;

fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, ApiError> {
    T::from_str(raw).map_err(|_| ApiError::Validation(format!("invalid {what} id")))
}

#[derive(Debug, Deserialize)]
pub struct CreatePromptRequest {
    pub project_id: String,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub content: String,
    #[serde(default)]
    pub variables: Vec<VariableDef>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_shared: bool,
}

pub async fn create_prompt(
    State(state): State<AppState>,
    Json(req): Json<CreatePromptRequest>,
) -> Result<Json<ApiResponse<Prompt>>, ApiError> {
    let project_id: ProjectId = parse_id(&req.project_id, "project")?;
    state.store.get_project(project_id).await?; // 404s if the project doesn't exist

    let mut prompt = Prompt::new(project_id, req.slug, req.name, req.content, req.variables, None);
    prompt.description = req.description;
    prompt.tags = Prompt::normalize_tags(req.tags);
    prompt.category = req.category;
    prompt.is_shared = req.is_shared;

    let mut txn = state.store.begin().await?;
    txn.stage_prompt(prompt.clone());
    state.store.commit(txn).await?;
    Ok(Json(ApiResponse::ok(prompt)))
}

pub async fn get_prompt(
    State(state): State<AppState>,
    Path(prompt_id): Path<String>,
) -> Result<Json<ApiResponse<Prompt>>, ApiError> {
    let id: PromptId = parse_id(&prompt_id, "prompt")?;
    let prompt = state.store.get_prompt(id).await?;
    Ok(Json(ApiResponse::ok(prompt)))
}

pub async fn list_prompts(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<Vec<Prompt>>>, ApiError> {
    let project_id: ProjectId = parse_id(&project_id, "project")?;
    let prompts = state.store.list_prompts(project_id).await?;
    let (page_items, meta) = paginate(prompts, &params);
    Ok(Json(ApiResponse::paginated(page_items, meta)))
}

#[derive(Debug, Deserialize)]
pub struct RenderPromptRequest {
    #[serde(default)]
    pub variables: VarMap,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RenderPromptResponse {
    pub rendered: String,
}

pub async fn render_prompt(
    State(state): State<AppState>,
    Path(prompt_id): Path<String>,
    Json(req): Json<RenderPromptRequest>,
) -> Result<Json<ApiResponse<RenderPromptResponse>>, ApiError> {
    let id: PromptId = parse_id(&prompt_id, "prompt")?;
    let prompt = state.store.get_prompt(id).await?;
    let rendered = prompt_ops::render_prompt(
        state.store.as_ref(),
        &prompt,
        req.variables,
        req.version.as_deref(),
        None,
    )
    .await?;
    Ok(Json(ApiResponse::ok(RenderPromptResponse { rendered })))
}

#[derive(Debug, Deserialize)]
pub struct PublishPromptRequest {
    pub content: String,
    #[serde(default)]
    pub variables: Vec<VariableDef>,
    pub bump: VersionBump,
    #[serde(default)]
    pub change_note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PublishPromptResponse {
    pub prompt: Prompt,
    pub version: PromptVersion,
}

pub async fn publish_prompt(
    State(state): State<AppState>,
    Path(prompt_id): Path<String>,
    Json(req): Json<PublishPromptRequest>,
) -> Result<Json<ApiResponse<PublishPromptResponse>>, ApiError> {
    let id: PromptId = parse_id(&prompt_id, "prompt")?;
    let prompt = state.store.get_prompt(id).await?;

    let mut txn = state.store.begin().await?;
    let (updated, version) = engine_version::publish_version(
        &mut txn,
        &prompt,
        req.content,
        req.variables,
        req.bump,
        req.change_note,
        None,
    )?;
    state.store.commit(txn).await?;

    Ok(Json(ApiResponse::ok(PublishPromptResponse {
        prompt: updated,
        version,
    })))
}

pub async fn list_versions(
    State(state): State<AppState>,
    Path(prompt_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<PromptVersion>>>, ApiError> {
    let id: PromptId = parse_id(&prompt_id, "prompt")?;
    state.store.get_prompt(id).await?; // 404s if missing
    let versions = state.store.list_versions(id).await?;
    Ok(Json(ApiResponse::ok(versions)))
}

#[derive(Debug, Deserialize)]
pub struct ForkPromptRequest {
    pub target_project_id: String,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ForkPromptResponse {
    pub prompt: Prompt,
    pub source_ref: promptforge_core::PromptRef,
}

pub async fn fork_prompt(
    State(state): State<AppState>,
    Path(prompt_id): Path<String>,
    Json(req): Json<ForkPromptRequest>,
) -> Result<Json<ApiResponse<ForkPromptResponse>>, ApiError> {
    let id: PromptId = parse_id(&prompt_id, "prompt")?;
    let target_project_id: ProjectId = parse_id(&req.target_project_id, "project")?;
    let source = state.store.get_prompt(id).await?;

    let (forked, fork_ref) =
        prompt_ops::fork_prompt(state.store.as_ref(), &source, target_project_id, None, req.slug).await?;

    Ok(Json(ApiResponse::ok(ForkPromptResponse {
        prompt: forked,
        source_ref: fork_ref,
    })))
}

pub async fn impact_analysis(
    State(state): State<AppState>,
    Path(prompt_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Scene>>>, ApiError> {
    let id: PromptId = parse_id(&prompt_id, "prompt")?;
    let scenes = prompt_ops::impacted_scenes(state.store.as_ref(), id).await?;
    Ok(Json(ApiResponse::ok(scenes)))
}
