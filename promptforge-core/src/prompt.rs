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
use std::collections::BTreeSet;

use crate::ids::{PromptId, ProjectId, UserId};
use crate::variable::VariableDef;

/// A named, versioned template owned by a project.
///
/// `current_version` always points at the highest published semver for this
/// prompt (invariant I8); `content`/`variables` here are the *draft* values —
/// they become an immutable [`crate::version::PromptVersion`] snapshot only
/// when published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    pub id: PromptId,
    pub project_id: ProjectId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub content: String,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_template_engine")]
    pub template_engine: String,
    #[serde(default)]
    pub variables: Vec<VariableDef>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub is_shared: bool,
    #[serde(default = "default_version")]
    pub current_version: String,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

fn default_format() -> String {
    "text".to_string()
}

fn default_template_engine() -> String {
    "jinja2".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl Prompt {
    pub fn new(
        project_id: ProjectId,
        slug: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
        variables: Vec<VariableDef>,
        created_by: Option<UserId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PromptId::new(),
            project_id,
            slug: slug.into(),
            name: name.into(),
            description: None,
            content: content.into(),
            format: default_format(),
            template_engine: default_template_engine(),
            variables,
            tags: BTreeSet::new(),
            category: None,
            is_shared: false,
            current_version: default_version(),
            created_by,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Tags are normalized to lowercase on insert; callers should route new
    /// tag strings through this instead of inserting directly.
    pub fn normalize_tags(tags: impl IntoIterator<Item = String>) -> BTreeSet<String> {
        tags.into_iter().map(|t| t.to_lowercase()).collect()
    }
}
