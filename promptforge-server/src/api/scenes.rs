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
use serde::Deserialize;

use promptforge_core::{PipelineConfig, ProjectId, Scene, SceneId, VarMap};
use promptforge_engine::{graph_export, resolve, scene_validate, SceneResolution};
use promptforge_engine::graph_export::SceneGraph;

use crate::api::envelope::{paginate, ApiResponse, ListParams};
use crate::api::AppState;
use crate::error::ApiError;

fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, ApiError> {
    T::from_str(raw).map_err(|_| ApiError::Validation(format!("invalid {what} id")))
}

#[derive(Debug, Deserialize)]
pub struct CreateSceneRequest {
    pub project_id: String,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub output_format: Option<String>,
}

pub async fn create_scene(
    State(state): State<AppState>,
    Json(req): Json<CreateSceneRequest>,
) -> Result<Json<ApiResponse<Scene>>, ApiError> {
    let project_id: ProjectId = parse_id(&req.project_id, "project")?;
    state.store.get_project(project_id).await?;

    // Fail fast on a pipeline that can't resolve rather than saving it broken.
    let resolved = scene_validate::validate_pipeline_prompts(state.store.as_ref(), &req.pipeline, project_id).await?;
    scene_validate::check_pipeline_cycles(state.store.as_ref(), &resolved).await?;

    let mut scene = Scene::new(project_id, req.slug, req.name, req.pipeline, None);
    scene.description = req.description;
    scene.output_format = req.output_format;

    let mut txn = state.store.begin().await?;
    txn.stage_scene(scene.clone());
    state.store.commit(txn).await?;
    Ok(Json(ApiResponse::ok(scene)))
}

pub async fn get_scene(
    State(state): State<AppState>,
    Path(scene_id): Path<String>,
) -> Result<Json<ApiResponse<Scene>>, ApiError> {
    let id: SceneId = parse_id(&scene_id, "scene")?;
    let scene = state.store.get_scene(id).await?;
    Ok(Json(ApiResponse::ok(scene)))
}

pub async fn list_scenes(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<Vec<Scene>>>, ApiError> {
    let project_id: ProjectId = parse_id(
        params
            .project_id
            .as_deref()
            .ok_or_else(|| ApiError::Validation("project_id query parameter is required".into()))?,
        "project",
    )?;
    let scenes = state.store.list_scenes(project_id).await?;
    let (page_items, meta) = paginate(scenes, &params);
    Ok(Json(ApiResponse::paginated(page_items, meta)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateSceneRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub pipeline: Option<PipelineConfig>,
    #[serde(default)]
    pub output_format: Option<Option<String>>,
}

/// Re-runs the Scene Validator only when `pipeline` is touched.
pub async fn update_scene(
    State(state): State<AppState>,
    Path(scene_id): Path<String>,
    Json(req): Json<UpdateSceneRequest>,
) -> Result<Json<ApiResponse<Scene>>, ApiError> {
    let id: SceneId = parse_id(&scene_id, "scene")?;
    let mut scene = state.store.get_scene(id).await?;

    if let Some(name) = req.name {
        scene.name = name;
    }
    if let Some(description) = req.description {
        scene.description = description;
    }
    if let Some(pipeline) = req.pipeline {
        let resolved =
            scene_validate::validate_pipeline_prompts(state.store.as_ref(), &pipeline, scene.project_id).await?;
        scene_validate::check_pipeline_cycles(state.store.as_ref(), &resolved).await?;
        scene.pipeline = pipeline;
    }
    if let Some(output_format) = req.output_format {
        scene.output_format = output_format;
    }
    scene.updated_at = chrono::Utc::now();

    let mut txn = state.store.begin().await?;
    txn.stage_scene(scene.clone());
    state.store.commit(txn).await?;
    Ok(Json(ApiResponse::ok(scene)))
}

#[derive(Debug, Deserialize)]
pub struct ResolveSceneRequest {
    #[serde(default)]
    pub variables: VarMap,
    #[serde(default)]
    pub caller_system: Option<String>,
}

pub async fn resolve_scene(
    State(state): State<AppState>,
    Path(scene_id): Path<String>,
    Json(req): Json<ResolveSceneRequest>,
) -> Result<Json<ApiResponse<SceneResolution>>, ApiError> {
    let id: SceneId = parse_id(&scene_id, "scene")?;
    let scene = state.store.get_scene(id).await?;
    let resolution = resolve::resolve_scene(
        state.store.as_ref(),
        &scene,
        req.variables,
        req.caller_system,
        None,
        None,
    )
    .await?;
    Ok(Json(ApiResponse::ok(resolution)))
}

pub async fn scene_graph(
    State(state): State<AppState>,
    Path(scene_id): Path<String>,
) -> Result<Json<ApiResponse<SceneGraph>>, ApiError> {
    let id: SceneId = parse_id(&scene_id, "scene")?;
    let scene = state.store.get_scene(id).await?;
    let graph = graph_export::export_scene_graph(state.store.as_ref(), &scene).await?;
    Ok(Json(ApiResponse::ok(graph)))
}
