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

//! Prompt-level operations that don't belong to a single-responsibility
//! engine module on their own: single-prompt rendering, ref lifecycle,
//! fork, and impact analysis.

use std::time::Instant;

use tracing::instrument;

use promptforge_core::{
    CallLog, CoreError, Prompt, PromptId, PromptRef, PromptRefId, Scene, UserId, VarMap,
};
use promptforge_storage::PersistencePort;

use crate::call_log;
use crate::error::{EngineError, EngineResult};
use crate::graph::check_no_cycles;
use crate::render;
use crate::version::resolve_content;

/// Validates variables, renders `prompt`'s content (a specific version if
/// named, else `current_version`), and records a best-effort call log.
#[instrument(skip(store, variables))]
pub async fn render_prompt(
    store: &dyn PersistencePort,
    prompt: &Prompt,
    variables: VarMap,
    requested_version: Option<&str>,
    called_by: Option<UserId>,
) -> EngineResult<String> {
    let start = Instant::now();
    let (content, var_defs, version) = resolve_content(store, prompt, requested_version).await?;
    let validated = render::validate_variables(&var_defs, &variables)?;
    let rendered = render::render(&content, &validated)?;

    let elapsed_ms = start.elapsed().as_millis() as u64;
    let token_count = (rendered.len() / 4) as u64;
    call_log::record(
        store,
        CallLog::for_render(
            prompt.id,
            Some(version),
            None,
            None,
            variables,
            rendered.clone(),
            Some(token_count),
            elapsed_ms,
            called_by,
        ),
    )
    .await;

    Ok(rendered)
}

/// Creates a `source -> target` reference after checking cross-project
/// sharing and that the edge would not close a cycle.
pub async fn create_ref(
    store: &dyn PersistencePort,
    source_id: PromptId,
    target_id: PromptId,
    ref_type: impl Into<String>,
    override_config: Option<VarMap>,
    created_by: Option<UserId>,
) -> EngineResult<PromptRef> {
    let source = store.get_prompt(source_id).await?;
    let target = store.get_prompt(target_id).await?;

    if source.project_id != target.project_id && !target.is_shared {
        return Err(EngineError::Core(CoreError::PermissionDenied(format!(
            "target prompt '{}' is not shared outside its project",
            target.name
        ))));
    }

    let existing = store.list_all_refs().await?;
    check_no_cycles(&existing, (source_id, target_id))?;

    let new_ref = PromptRef::new(
        source_id,
        target_id,
        Some(source.project_id),
        Some(target.project_id),
        ref_type,
        override_config,
        created_by,
    );
    let mut txn = store.begin().await?;
    txn.stage_ref(new_ref.clone());
    store.commit(txn).await?;
    Ok(new_ref)
}

pub async fn delete_ref(store: &dyn PersistencePort, ref_id: PromptRefId) -> EngineResult<()> {
    store.get_ref(ref_id).await?; // 404s if missing
    let mut txn = store.begin().await?;
    txn.stage_ref_deletion(ref_id);
    store.commit(txn).await?;
    Ok(())
}

pub async fn list_refs_for_prompt(
    store: &dyn PersistencePort,
    prompt_id: PromptId,
) -> EngineResult<(Vec<PromptRef>, Vec<PromptRef>)> {
    store.get_prompt(prompt_id).await?;
    let outgoing = store.list_refs_by_source(prompt_id).await?;
    let incoming = store.list_refs_by_target(prompt_id).await?;
    Ok((outgoing, incoming))
}

/// Every scene whose pipeline has a step resolving to `prompt_id`, in any
/// project — "what would changing this prompt affect".
pub async fn impacted_scenes(store: &dyn PersistencePort, prompt_id: PromptId) -> EngineResult<Vec<Scene>> {
    let target = store.get_prompt(prompt_id).await?;
    let projects = store.list_projects().await?;

    let mut hits = Vec::new();
    for project in projects {
        for scene in store.list_scenes(project.id).await? {
            for step in &scene.pipeline.steps {
                let step_project_id = match &step.project_slug {
                    Some(slug) => match store.get_project_by_slug(slug).await {
                        Ok(p) => p.id,
                        Err(_) => continue,
                    },
                    None => scene.project_id,
                };
                if step_project_id == target.project_id && step.prompt_slug == target.slug {
                    hits.push(scene.clone());
                    break;
                }
            }
        }
    }
    Ok(hits)
}

/// Copies a shared prompt's current draft into `target_project_id` as a new,
/// unshared prompt, then links the fork back to its source with an
/// `includes` ref.
pub async fn fork_prompt(
    store: &dyn PersistencePort,
    source: &Prompt,
    target_project_id: promptforge_core::ProjectId,
    created_by: Option<UserId>,
    slug_override: Option<String>,
) -> EngineResult<(Prompt, PromptRef)> {
    if !source.is_shared {
        return Err(EngineError::Core(CoreError::PermissionDenied(format!(
            "prompt '{}' is not shared and cannot be forked",
            source.name
        ))));
    }

    let new_slug = slug_override.unwrap_or_else(|| format!("{}-fork", source.slug));
    let mut forked = Prompt::new(
        target_project_id,
        new_slug,
        format!("{} (fork)", source.name),
        source.content.clone(),
        source.variables.clone(),
        created_by,
    );
    forked.description = source.description.clone();
    forked.format = source.format.clone();
    forked.template_engine = source.template_engine.clone();
    forked.tags = source.tags.clone();
    forked.category = source.category.clone();

    let fork_ref = PromptRef::new(
        forked.id,
        source.id,
        Some(target_project_id),
        Some(source.project_id),
        "includes",
        None,
        created_by,
    );

    let mut txn = store.begin().await?;
    txn.stage_prompt(forked.clone());
    txn.stage_ref(fork_ref.clone());
    store.commit(txn).await?;

    Ok((forked, fork_ref))
}
