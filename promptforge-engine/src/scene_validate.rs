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

//! The Scene Validator: every prompt a pipeline step names must exist, be
//! live, and — if it lives in another project — be shared; and the
//! `PromptRef` graph restricted to those prompts must already be acyclic.

use std::collections::{HashMap, HashSet};

use promptforge_core::{CoreError, PipelineConfig, ProjectId, Prompt, PromptId};
use promptforge_storage::PersistencePort;

use crate::error::{EngineError, EngineResult};
use crate::graph::{build_full_ref_graph, topological_sort};

/// Resolves and validates every step's target prompt, returning them keyed
/// by `step_id` in pipeline order for the caller to use during resolution.
pub async fn validate_pipeline_prompts(
    store: &dyn PersistencePort,
    pipeline: &PipelineConfig,
    scene_project_id: ProjectId,
) -> EngineResult<HashMap<String, Prompt>> {
    let mut resolved = HashMap::new();
    let mut missing = Vec::new();

    for step in &pipeline.steps {
        let project_id = match &step.project_slug {
            Some(slug) => store.get_project_by_slug(slug).await?.id,
            None => scene_project_id,
        };
        let prompt = match store.get_prompt_by_slug(project_id, &step.prompt_slug).await {
            Ok(prompt) if prompt.is_live() => prompt,
            _ => {
                missing.push(format!("{} (step '{}')", step.prompt_slug, step.step_id));
                continue;
            }
        };
        if prompt.project_id != scene_project_id && !prompt.is_shared {
            return Err(EngineError::Core(CoreError::PermissionDenied(format!(
                "prompt '{}' is not shared outside its project",
                step.prompt_slug
            ))));
        }
        resolved.insert(step.step_id.clone(), prompt);
    }

    if !missing.is_empty() {
        return Err(EngineError::Core(CoreError::NotFound(format!(
            "prompt(s) referenced by the pipeline are missing: {}",
            missing.join(", ")
        ))));
    }

    Ok(resolved)
}

/// Restricts the full `PromptRef` graph to the prompts a pipeline touches
/// and proves that subgraph acyclic. A cycle here means the pipeline's own
/// prompts reference each other in a loop — unrelated to step order.
pub async fn check_pipeline_cycles(
    store: &dyn PersistencePort,
    resolved_prompts: &HashMap<String, Prompt>,
) -> EngineResult<()> {
    let prompt_ids: HashSet<PromptId> = resolved_prompts.values().map(|p| p.id).collect();
    if prompt_ids.is_empty() {
        return Ok(());
    }

    let all_refs = store.list_all_refs().await?;
    let scoped_refs: Vec<_> = all_refs
        .into_iter()
        .filter(|r| prompt_ids.contains(&r.source) && prompt_ids.contains(&r.target))
        .collect();

    let graph = build_full_ref_graph(&scoped_refs);
    topological_sort(&graph)
        .map(|_| ())
        .map_err(|stuck| EngineError::Cycle(format!("pipeline prompts form a cycle ({} node(s))", stuck.len())))
}
