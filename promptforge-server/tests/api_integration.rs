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

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value as Json};
use tower::ServiceExt;

use promptforge_server::api::build_router;
use promptforge_server::config::ServerConfig;

async fn body_json(response: axum::response::Response) -> Json {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(uri: &str, body: Json) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn patch(uri: &str, body: Json) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn health_check_is_public() {
    let config = ServerConfig::from_env();
    let state = promptforge_server::build_state(&config);
    let app = build_router(state, &config);

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_project_then_prompt_then_render() {
    let config = ServerConfig::from_env();
    let state = promptforge_server::build_state(&config);
    let app = build_router(state, &config);

    let response = app
        .clone()
        .oneshot(post(
            "/api/v1/projects",
            json!({ "slug": "marketing", "name": "Marketing" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let project_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post(
            "/api/v1/prompts",
            json!({
                "project_id": project_id,
                "slug": "welcome-email",
                "name": "Welcome Email",
                "content": "Hello {{ name }}, welcome to {{ product }}!",
                "variables": [
                    { "name": "name", "type": "string", "required": true },
                    { "name": "product", "type": "string", "required": false, "default": "PromptForge" }
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let prompt_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post(
            &format!("/api/v1/prompts/{prompt_id}/render"),
            json!({ "variables": { "name": "Ada" } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["data"]["rendered"].as_str().unwrap(),
        "Hello Ada, welcome to PromptForge!"
    );
}

#[tokio::test]
async fn rendering_with_missing_required_variable_is_unprocessable() {
    let config = ServerConfig::from_env();
    let state = promptforge_server::build_state(&config);
    let app = build_router(state, &config);

    let response = app
        .clone()
        .oneshot(post(
            "/api/v1/projects",
            json!({ "slug": "support", "name": "Support" }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let project_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post(
            "/api/v1/prompts",
            json!({
                "project_id": project_id,
                "slug": "ticket-reply",
                "name": "Ticket Reply",
                "content": "Dear {{ customer }},",
                "variables": [{ "name": "customer", "type": "string", "required": true }]
            }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let prompt_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post(
            &format!("/api/v1/prompts/{prompt_id}/render"),
            json!({ "variables": {} }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn scene_pipeline_resolves_and_concatenates_two_steps() {
    let config = ServerConfig::from_env();
    let state = promptforge_server::build_state(&config);
    let app = build_router(state, &config);

    let response = app
        .clone()
        .oneshot(post(
            "/api/v1/projects",
            json!({ "slug": "onboarding", "name": "Onboarding" }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let project_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post(
            "/api/v1/prompts",
            json!({ "project_id": project_id, "slug": "greeting", "name": "Greeting", "content": "Hi {{ name }}." }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let greeting_id = body["data"]["id"].as_str().unwrap().to_string();
    let _ = greeting_id;

    let response = app
        .clone()
        .oneshot(post(
            "/api/v1/prompts",
            json!({ "project_id": project_id, "slug": "next-steps", "name": "Next Steps", "content": "Next, do {{ task }}." }),
        ))
        .await
        .unwrap();
    let _ = body_json(response).await;

    let response = app
        .clone()
        .oneshot(post(
            "/api/v1/scenes",
            json!({
                "project_id": project_id,
                "slug": "onboarding-flow",
                "name": "Onboarding Flow",
                "pipeline": {
                    "steps": [
                        { "step_id": "step-1", "prompt_slug": "greeting", "variables": { "name": "Ada" } },
                        { "step_id": "step-2", "prompt_slug": "next-steps", "variables": { "task": "verify your email" } }
                    ],
                    "merge": { "kind": "concat", "separator": " " }
                }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let scene_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post(
            &format!("/api/v1/scenes/{scene_id}/resolve"),
            json!({ "variables": {} }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["data"]["final_content"].as_str().unwrap(),
        "Hi Ada. Next, do verify your email."
    );
}

#[tokio::test]
async fn unknown_prompt_id_is_not_found() {
    let config = ServerConfig::from_env();
    let state = promptforge_server::build_state(&config);
    let app = build_router(state, &config);

    let fake_id = uuid::Uuid::new_v4();
    let response = app
        .oneshot(get(&format!("/api/v1/prompts/{fake_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ref_creation_then_scene_update_revalidates_pipeline() {
    let config = ServerConfig::from_env();
    let state = promptforge_server::build_state(&config);
    let app = build_router(state, &config);

    let response = app
        .clone()
        .oneshot(post(
            "/api/v1/projects",
            json!({ "slug": "docs", "name": "Docs" }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let project_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post(
            "/api/v1/prompts",
            json!({ "project_id": project_id, "slug": "intro", "name": "Intro", "content": "Welcome." }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let intro_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post(
            "/api/v1/prompts",
            json!({ "project_id": project_id, "slug": "outro", "name": "Outro", "content": "Goodbye." }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let outro_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post(
            "/api/v1/refs",
            json!({ "source_id": intro_id, "target_id": outro_id, "ref_type": "composes" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post(
            "/api/v1/scenes",
            json!({
                "project_id": project_id,
                "slug": "single-step",
                "name": "Single Step",
                "pipeline": {
                    "steps": [{ "step_id": "step-1", "prompt_slug": "intro", "variables": {} }],
                    "merge": { "kind": "concat", "separator": " " }
                }
            }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let scene_id = body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(patch(
            &format!("/api/v1/scenes/{scene_id}"),
            json!({
                "pipeline": {
                    "steps": [
                        { "step_id": "step-1", "prompt_slug": "intro", "variables": {} },
                        { "step_id": "step-2", "prompt_slug": "outro", "variables": {} }
                    ],
                    "merge": { "kind": "concat", "separator": " " }
                }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["pipeline"]["steps"].as_array().unwrap().len(), 2);

    let response = app
        .oneshot(get(&format!("/api/v1/scenes/{scene_id}/dependencies")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let nodes = body["data"]["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 2);
    for node in nodes {
        assert!(node["id"].is_string());
        assert!(node["name"].is_string());
        assert!(node["project_id"].is_string());
        assert!(node["version"].is_string());
        assert!(node["is_shared"].is_boolean());
    }

    let edges = body["data"]["edges"].as_array().unwrap();
    // One synthesized scene->step edge per step, plus the "composes" ref.
    assert_eq!(edges.len(), 3);
    let step_edges: Vec<_> = edges
        .iter()
        .filter(|e| e["step_id"].is_string())
        .collect();
    assert_eq!(step_edges.len(), 2);
    for edge in &step_edges {
        assert_eq!(edge["ref_type"], "composes");
    }
    assert!(edges
        .iter()
        .any(|e| e["step_id"].is_null() && e["ref_type"] == "composes"));
}
