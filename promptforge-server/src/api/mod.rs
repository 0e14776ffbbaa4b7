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

pub mod envelope;
pub mod health;
pub mod projects;
pub mod prompts;
pub mod refs;
pub mod scenes;

use std::sync::Arc;

use axum::middleware as axum_middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use promptforge_storage::PersistencePort;

use crate::auth::{auth_middleware, Authenticator};
use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PersistencePort>,
    pub authenticator: Arc<dyn Authenticator>,
}

/// Assembles the full router: public health check, then every
/// authenticated resource route, CORS and request tracing applied last so
/// they wrap the whole stack.
pub fn build_router(state: AppState, _config: &ServerConfig) -> Router {
    let authed = Router::new()
        .route(
            "/api/v1/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route("/api/v1/projects/:project_id", get(projects::get_project))
        .route(
            "/api/v1/projects/:project_id/prompts",
            get(prompts::list_prompts),
        )
        .route("/api/v1/prompts", post(prompts::create_prompt))
        .route(
            "/api/v1/prompts/:prompt_id",
            get(prompts::get_prompt),
        )
        .route(
            "/api/v1/prompts/:prompt_id/render",
            post(prompts::render_prompt),
        )
        .route(
            "/api/v1/prompts/:prompt_id/publish",
            post(prompts::publish_prompt),
        )
        .route(
            "/api/v1/prompts/:prompt_id/versions",
            get(prompts::list_versions),
        )
        .route(
            "/api/v1/prompts/:prompt_id/fork",
            post(prompts::fork_prompt),
        )
        .route(
            "/api/v1/prompts/:prompt_id/impact",
            get(prompts::impact_analysis),
        )
        .route("/api/v1/prompts/:prompt_id/refs", get(refs::list_refs))
        .route("/api/v1/refs", post(refs::create_ref))
        .route("/api/v1/refs/:ref_id", axum::routing::delete(refs::delete_ref))
        .route("/api/v1/scenes", get(scenes::list_scenes).post(scenes::create_scene))
        .route(
            "/api/v1/scenes/:scene_id",
            get(scenes::get_scene).patch(scenes::update_scene),
        )
        .route(
            "/api/v1/scenes/:scene_id/resolve",
            post(scenes::resolve_scene),
        )
        .route(
            "/api/v1/scenes/:scene_id/dependencies",
            get(scenes::scene_graph),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(authed)
        .with_state(state)
        .layer(CorsLayer::new().allow_methods(Any).allow_headers(Any).allow_origin(Any))
        .layer(TraceLayer::new_for_http())
}
