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

use crate::ids::{CallLogId, PromptId, SceneId, UserId};
use crate::value::VarMap;

/// A best-effort record of one render or scene resolution. Writing a
/// `CallLog` entry must never fail the operation it describes — the
/// Call Logger swallows its own storage errors and only emits a
/// `tracing::warn!` on the way out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallLog {
    pub id: CallLogId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_id: Option<PromptId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_id: Option<SceneId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller_system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller_ip: Option<String>,
    pub input_variables: VarMap,
    pub rendered_content: String,
    #[serde(default)]
    pub steps_skipped: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_count: Option<u64>,
    pub response_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
    pub called_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl CallLog {
    #[allow(clippy::too_many_arguments)]
    pub fn for_render(
        prompt_id: PromptId,
        prompt_version: Option<String>,
        caller_system: Option<String>,
        caller_ip: Option<String>,
        input_variables: VarMap,
        rendered_content: String,
        token_count: Option<u64>,
        response_time_ms: u64,
        called_by: Option<UserId>,
    ) -> Self {
        Self {
            id: CallLogId::new(),
            prompt_id: Some(prompt_id),
            scene_id: None,
            prompt_version,
            caller_system,
            caller_ip,
            input_variables,
            rendered_content,
            steps_skipped: Vec::new(),
            token_count,
            response_time_ms,
            quality_score: None,
            called_by,
            created_at: Utc::now(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn for_scene(
        scene_id: SceneId,
        caller_system: Option<String>,
        caller_ip: Option<String>,
        input_variables: VarMap,
        rendered_content: String,
        steps_skipped: Vec<String>,
        token_count: Option<u64>,
        response_time_ms: u64,
        called_by: Option<UserId>,
    ) -> Self {
        Self {
            id: CallLogId::new(),
            prompt_id: None,
            scene_id: Some(scene_id),
            prompt_version: None,
            caller_system,
            caller_ip,
            input_variables,
            rendered_content,
            steps_skipped,
            token_count,
            response_time_ms,
            quality_score: None,
            called_by,
            created_at: Utc::now(),
        }
    }
}
