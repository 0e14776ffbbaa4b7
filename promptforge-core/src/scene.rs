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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ProjectId, SceneId, UserId};
use crate::value::{Value, VarMap};

/// A saved pipeline: an ordered list of prompt steps plus how their
/// rendered outputs are combined into one final string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub id: SceneId,
    pub project_id: ProjectId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub pipeline: PipelineConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Scene {
    pub fn new(
        project_id: ProjectId,
        slug: impl Into<String>,
        name: impl Into<String>,
        pipeline: PipelineConfig,
        created_by: Option<UserId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: SceneId::new(),
            project_id,
            slug: slug.into(),
            name: name.into(),
            description: None,
            pipeline,
            output_format: None,
            created_by,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub steps: Vec<PipelineStep>,
    #[serde(default)]
    pub merge: MergeStrategy,
}

/// One stage of a scene. `project_slug` is only set for a cross-project
/// reference; `None` means "resolve `prompt_slug` within the scene's own
/// project", which is the common case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStep {
    pub step_id: String,
    pub prompt_slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_slug: Option<String>,
    /// Version to render; `None` means "whatever `current_version` is at
    /// resolve time" (see [`crate::prompt::Prompt::current_version`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub variables: VarMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<StepCondition>,
    /// Key this step's output is recorded under in `chain_context` when the
    /// scene's merge strategy is `chain`. Defaults to `step_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_key: Option<String>,
}

/// A gate evaluated against the in-progress evaluation variables before a
/// step runs; a failing condition skips the step rather than erroring the
/// scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepCondition {
    pub variable: String,
    pub operator: ConditionOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Eq,
    Neq,
    In,
    NotIn,
    Exists,
}

/// How step outputs are folded into the scene's final rendered string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MergeStrategy {
    Concat { separator: String },
    Chain,
    /// Reserved for a future scoring pass; currently behaves like the first
    /// non-skipped output, same as the system this was modeled on.
    SelectBest,
}

impl Default for MergeStrategy {
    fn default() -> Self {
        MergeStrategy::Concat {
            separator: "\n\n".to_string(),
        }
    }
}
