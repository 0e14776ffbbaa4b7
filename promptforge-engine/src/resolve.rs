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

//! The Scene Resolution Engine: runs a scene's pipeline end to end —
//! evaluating step conditions, fetching each step's prompt content,
//! merging variables with the three-tier precedence, rendering, and
//! folding step outputs into one final string per the scene's merge
//! strategy.

use std::collections::HashMap;
use std::time::Instant;

use serde::Serialize;
use tracing::instrument;

use promptforge_core::{
    CallLog, ConditionOperator, MergeStrategy, PromptId, Scene, StepCondition, UserId, Value,
    VarMap,
};
use promptforge_storage::PersistencePort;

use crate::call_log;
use crate::error::EngineResult;
use crate::render;
use crate::scene_validate::{check_pipeline_cycles, validate_pipeline_prompts};
use crate::version::resolve_content;

#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub step_id: String,
    pub prompt_id: Option<PromptId>,
    pub prompt_name: String,
    pub version: String,
    pub rendered_content: String,
    pub skipped: bool,
    pub skip_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneResolution {
    pub scene_id: promptforge_core::SceneId,
    pub scene_name: String,
    pub final_content: String,
    pub steps: Vec<StepResult>,
    pub total_token_estimate: usize,
}

/// `condition.value` is mandatory for every operator except `exists`.
fn evaluate_condition(condition: &StepCondition, vars: &VarMap) -> bool {
    let actual = vars.get(&condition.variable);
    match condition.operator {
        ConditionOperator::Eq => actual == condition.value.as_ref(),
        ConditionOperator::Neq => actual != condition.value.as_ref(),
        ConditionOperator::In => match (&condition.value, actual) {
            (Some(haystack), Some(v)) => v.is_in(haystack),
            _ => false,
        },
        ConditionOperator::NotIn => match (&condition.value, actual) {
            (Some(haystack), Some(v)) => !v.is_in(haystack),
            _ => true,
        },
        ConditionOperator::Exists => actual.is_some(),
    }
}

/// Three-tier merge: prompt defaults (lowest) < `folded_input` (highest of
/// the middle tier is whichever of `input_variables`/`chain_context` the
/// caller folded in last) < `step_variables` (highest).
fn merge_variables(
    var_defs: &[promptforge_core::VariableDef],
    folded_input: &VarMap,
    step_variables: &VarMap,
) -> VarMap {
    let mut result = VarMap::new();
    for def in var_defs {
        if let Some(default) = &def.default {
            result.insert(def.name.clone(), default.clone());
        }
    }
    result.extend(folded_input.clone());
    result.extend(step_variables.clone());
    result
}

#[instrument(skip(store, scene, input_variables))]
#[allow(clippy::too_many_arguments)]
pub async fn resolve_scene(
    store: &dyn PersistencePort,
    scene: &Scene,
    input_variables: VarMap,
    caller_system: Option<String>,
    caller_ip: Option<String>,
    called_by: Option<UserId>,
) -> EngineResult<SceneResolution> {
    let start = Instant::now();

    let resolved_prompts = validate_pipeline_prompts(store, &scene.pipeline, scene.project_id).await?;
    check_pipeline_cycles(store, &resolved_prompts).await?;

    let is_chain = matches!(scene.pipeline.merge, MergeStrategy::Chain);
    let mut chain_context: VarMap = VarMap::new();
    let mut steps = Vec::with_capacity(scene.pipeline.steps.len());

    for step in &scene.pipeline.steps {
        let eval_vars: VarMap = input_variables
            .iter()
            .chain(chain_context.iter())
            .chain(step.variables.iter())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        if let Some(condition) = &step.condition {
            if !evaluate_condition(condition, &eval_vars) {
                steps.push(StepResult {
                    step_id: step.step_id.clone(),
                    prompt_id: None,
                    prompt_name: String::new(),
                    version: String::new(),
                    rendered_content: String::new(),
                    skipped: true,
                    skip_reason: Some("condition not met".to_string()),
                });
                continue;
            }
        }

        // Unreachable if validate_pipeline_prompts succeeded, but keep this
        // local rather than indexing and risking a panic on drift.
        let prompt = resolved_prompts
            .get(&step.step_id)
            .expect("step was validated above");

        let (content, var_defs, version_str) =
            resolve_content(store, prompt, step.version.as_deref()).await?;

        let mut folded_input = VarMap::new();
        folded_input.extend(input_variables.clone());
        folded_input.extend(chain_context.clone());
        let merged = merge_variables(&var_defs, &folded_input, &step.variables);

        let validated = render::validate_variables(&var_defs, &merged)?;
        let rendered = render::render(&content, &validated)?;

        if is_chain {
            let key = step.output_key.clone().unwrap_or_else(|| step.step_id.clone());
            chain_context.insert(key, Value::String(rendered.clone()));
        }

        steps.push(StepResult {
            step_id: step.step_id.clone(),
            prompt_id: Some(prompt.id),
            prompt_name: prompt.name.clone(),
            version: version_str,
            rendered_content: rendered,
            skipped: false,
            skip_reason: None,
        });
    }

    let non_skipped: Vec<&StepResult> = steps.iter().filter(|s| !s.skipped).collect();
    let final_content = match &scene.pipeline.merge {
        MergeStrategy::Concat { separator } => non_skipped
            .iter()
            .map(|s| s.rendered_content.as_str())
            .collect::<Vec<_>>()
            .join(separator),
        MergeStrategy::Chain => non_skipped
            .last()
            .map(|s| s.rendered_content.clone())
            .unwrap_or_default(),
        MergeStrategy::SelectBest => non_skipped
            .first()
            .map(|s| s.rendered_content.clone())
            .unwrap_or_default(),
    };

    let elapsed_ms = start.elapsed().as_millis() as u64;
    let token_estimate = final_content.len() / 4;
    let steps_skipped: Vec<String> = steps
        .iter()
        .filter(|s| s.skipped)
        .map(|s| s.step_id.clone())
        .collect();

    call_log::record(
        store,
        CallLog::for_scene(
            scene.id,
            caller_system,
            caller_ip,
            input_variables,
            final_content.clone(),
            steps_skipped,
            Some(token_estimate as u64),
            elapsed_ms,
            called_by,
        ),
    )
    .await;

    Ok(SceneResolution {
        scene_id: scene.id,
        scene_name: scene.name.clone(),
        total_token_estimate: token_estimate,
        final_content,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptforge_core::VariableDef;

    fn vars(pairs: &[(&str, Value)]) -> VarMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn evaluate_condition_eq_and_exists() {
        let vars = vars(&[("tone", Value::from("formal"))]);
        let eq = StepCondition {
            variable: "tone".to_string(),
            operator: ConditionOperator::Eq,
            value: Some(Value::from("formal")),
        };
        assert!(evaluate_condition(&eq, &vars));

        let exists = StepCondition {
            variable: "missing".to_string(),
            operator: ConditionOperator::Exists,
            value: None,
        };
        assert!(!evaluate_condition(&exists, &vars));
    }

    #[test]
    fn merge_variables_respects_three_tier_precedence() {
        let defs = vec![VariableDef::new("tone").optional(Value::from("neutral"))];
        let mut folded = vars(&[("tone", Value::from("input-tone"))]);
        folded.extend(vars(&[("tone", Value::from("chain-tone"))]));
        // chain_context beats input_variables on collision (folded by the caller).
        let merged = merge_variables(&defs, &folded, &VarMap::new());
        assert_eq!(merged.get("tone").unwrap().as_str(), Some("chain-tone"));

        let step_vars = vars(&[("tone", Value::from("step-tone"))]);
        let merged = merge_variables(&defs, &folded, &step_vars);
        // step.variables always wins.
        assert_eq!(merged.get("tone").unwrap().as_str(), Some("step-tone"));
    }
}
