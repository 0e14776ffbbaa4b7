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

//! The Graph Exporter: a visualization-friendly projection of a scene's
//! pipeline for rendering as a dependency diagram client-side. Nodes are
//! exactly the prompts the pipeline's steps reference (not their
//! transitive `PromptRef` closure); edges are the synthesized
//! scene-to-step edges plus every `PromptRef` touching a referenced prompt.

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use promptforge_core::{ProjectId, PromptId, Scene};
use promptforge_storage::PersistencePort;

use crate::error::EngineResult;

#[derive(Debug, Clone, Serialize)]
pub struct DependencyNode {
    pub id: PromptId,
    pub name: String,
    pub project_id: ProjectId,
    pub version: String,
    pub is_shared: bool,
}

/// `source`/`target` are bare UUIDs rather than `PromptId` because the
/// synthesized scene->step edges source from a `SceneId`, not a `PromptId` —
/// an edge endpoint isn't always a prompt.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyEdge {
    pub source: Uuid,
    pub target: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,
    pub ref_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneGraph {
    pub nodes: Vec<DependencyNode>,
    pub edges: Vec<DependencyEdge>,
}

/// `ExportSceneGraph(sceneId)`: loads each step's referenced prompt (live
/// only), emits one node per prompt, one synthesized `scene -> prompt`
/// edge per step whose target exists, and one edge per `PromptRef` that
/// touches any of those prompts.
pub async fn export_scene_graph(store: &dyn PersistencePort, scene: &Scene) -> EngineResult<SceneGraph> {
    let mut step_prompts: Vec<(String, PromptId)> = Vec::new();

    for step in &scene.pipeline.steps {
        let project_id = match &step.project_slug {
            Some(slug) => store.get_project_by_slug(slug).await?.id,
            None => scene.project_id,
        };
        if let Ok(prompt) = store.get_prompt_by_slug(project_id, &step.prompt_slug).await {
            if prompt.is_live() {
                step_prompts.push((step.step_id.clone(), prompt.id));
            }
        }
    }

    let prompt_ids: HashSet<PromptId> = step_prompts.iter().map(|(_, id)| *id).collect();

    let mut nodes = Vec::with_capacity(prompt_ids.len());
    for &id in &prompt_ids {
        let prompt = store.get_prompt(id).await?;
        nodes.push(DependencyNode {
            id: prompt.id,
            name: prompt.name,
            project_id: prompt.project_id,
            version: prompt.current_version,
            is_shared: prompt.is_shared,
        });
    }

    let mut edges = Vec::new();
    for (step_id, prompt_id) in &step_prompts {
        edges.push(DependencyEdge {
            source: scene.id.0,
            target: prompt_id.0,
            step_id: Some(step_id.clone()),
            ref_type: "composes".to_string(),
        });
    }

    let all_refs = store.list_all_refs().await?;
    for r in all_refs
        .into_iter()
        .filter(|r| prompt_ids.contains(&r.source) || prompt_ids.contains(&r.target))
    {
        edges.push(DependencyEdge {
            source: r.source.0,
            target: r.target.0,
            step_id: None,
            ref_type: r.ref_type,
        });
    }

    Ok(SceneGraph { nodes, edges })
}
