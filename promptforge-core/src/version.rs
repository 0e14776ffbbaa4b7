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

use crate::ids::{PromptId, PromptVersionId, UserId};
use crate::variable::VariableDef;

/// An immutable snapshot of a prompt's content at the moment it was
/// published. Versions are never mutated or deleted once created
/// (invariant I9) — only appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptVersion {
    pub id: PromptVersionId,
    pub prompt_id: PromptId,
    pub version: String,
    pub content: String,
    pub variables: Vec<VariableDef>,
    pub change_note: Option<String>,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl PromptVersion {
    pub fn new(
        prompt_id: PromptId,
        version: impl Into<String>,
        content: impl Into<String>,
        variables: Vec<VariableDef>,
        change_note: Option<String>,
        created_by: Option<UserId>,
    ) -> Self {
        Self {
            id: PromptVersionId::new(),
            prompt_id,
            version: version.into(),
            content: content.into(),
            variables,
            change_note,
            created_by,
            created_at: Utc::now(),
        }
    }
}

/// The three parts of a bump, in the order the Version Store tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}
