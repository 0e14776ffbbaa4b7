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

use crate::ids::{ProjectId, PromptId, PromptRefId, UserId};
use crate::value::VarMap;

/// A directed edge `source -> target` in the prompt dependency graph.
/// `ref_type` is a free string (`"includes"`, `"composes"`, `"related"`,
/// ...), not a closed set — the Dependency Resolver treats every ref the
/// same regardless of its label when proving the graph acyclic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRef {
    pub id: PromptRefId,
    pub source: PromptId,
    pub target: PromptId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_project_id: Option<ProjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_project_id: Option<ProjectId>,
    pub ref_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_config: Option<VarMap>,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl PromptRef {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: PromptId,
        target: PromptId,
        source_project_id: Option<ProjectId>,
        target_project_id: Option<ProjectId>,
        ref_type: impl Into<String>,
        override_config: Option<VarMap>,
        created_by: Option<UserId>,
    ) -> Self {
        Self {
            id: PromptRefId::new(),
            source,
            target,
            source_project_id,
            target_project_id,
            ref_type: ref_type.into(),
            override_config,
            created_by,
            created_at: Utc::now(),
        }
    }
}
