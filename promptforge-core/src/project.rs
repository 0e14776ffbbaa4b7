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

use crate::ids::{ProjectId, UserId};

/// A namespace owning prompts and scenes. Slugs are globally unique and
/// kebab-case (`^[a-z0-9]+(?:-[a-z0-9]+)*$`, enforced at the HTTP boundary).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(slug: impl Into<String>, name: impl Into<String>, created_by: Option<UserId>) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::new(),
            slug: slug.into(),
            name: name.into(),
            description: None,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// `^[a-z0-9]+(?:-[a-z0-9]+)*$` — kebab-case, no leading/trailing/double hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    if slug.is_empty() {
        return false;
    }
    let mut prev_was_hyphen = true; // disallow leading hyphen
    for (i, c) in slug.char_indices() {
        match c {
            'a'..='z' | '0'..='9' => prev_was_hyphen = false,
            '-' if !prev_was_hyphen => prev_was_hyphen = true,
            _ => return false,
        }
        let _ = i;
    }
    !prev_was_hyphen // disallow trailing hyphen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_validation() {
        assert!(is_valid_slug("my-project"));
        assert!(is_valid_slug("a"));
        assert!(is_valid_slug("a1-b2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("trailing-"));
        assert!(!is_valid_slug("Has-Caps"));
        assert!(!is_valid_slug("double--hyphen"));
        assert!(!is_valid_slug("under_score"));
    }
}
