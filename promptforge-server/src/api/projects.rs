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

use promptforge_core::{Project, ProjectId};

use crate::api::envelope::{paginate, ApiResponse, ListParams};
use crate::api::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

pub async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<ApiResponse<Project>>, ApiError> {
    if !promptforge_core::project::is_valid_slug(&req.slug) {
        return Err(ApiError::Validation(format!("invalid slug '{}'", req.slug)));
    }
    let mut project = Project::new(req.slug, req.name, None);
    project.description = req.description;
    let created = state.store.create_project(project).await?;
    Ok(Json(ApiResponse::ok(created)))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<ApiResponse<Project>>, ApiError> {
    let id = ProjectId::from_str(&project_id).map_err(|_| ApiError::Validation("invalid project id".into()))?;
    let project = state.store.get_project(id).await?;
    Ok(Json(ApiResponse::ok(project)))
}

pub async fn list_projects(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<Vec<Project>>>, ApiError> {
    let projects = state.store.list_projects().await?;
    let (page_items, meta) = paginate(projects, &params);
    Ok(Json(ApiResponse::paginated(page_items, meta)))
}
