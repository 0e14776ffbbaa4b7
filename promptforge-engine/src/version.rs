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

//! The Version Store: semver bumping and the append-only publish flow.
//! Published versions are immutable — publishing never rewrites a row,
//! it only ever appends one and moves `Prompt::current_version` forward.

use semver::Version;
use tracing::info;

use promptforge_core::{Prompt, PromptVersion, UserId, VariableDef, VersionBump};
use promptforge_storage::{PersistencePort, Txn};

use crate::error::{EngineError, EngineResult};

/// Applies `bump` to `current`, resetting the lower-precedence components
/// to zero the way semver mandates (a minor bump zeroes patch, a major
/// bump zeroes both).
pub fn bump(current: &str, bump: VersionBump) -> EngineResult<String> {
    let mut version = Version::parse(current).map_err(|e| EngineError::InvalidBump {
        current: current.to_string(),
        reason: e.to_string(),
    })?;
    match bump {
        VersionBump::Major => {
            version.major += 1;
            version.minor = 0;
            version.patch = 0;
        }
        VersionBump::Minor => {
            version.minor += 1;
            version.patch = 0;
        }
        VersionBump::Patch => {
            version.patch += 1;
        }
    }
    version.pre = semver::Prerelease::EMPTY;
    version.build = semver::BuildMetadata::EMPTY;
    Ok(version.to_string())
}

/// Publishes the prompt's current draft content as a new immutable version,
/// staged in `txn` alongside the prompt's updated `current_version` pointer.
/// Caller commits the transaction.
pub fn publish_version(
    txn: &mut Txn,
    prompt: &Prompt,
    content: String,
    variables: Vec<VariableDef>,
    bump_kind: VersionBump,
    change_note: Option<String>,
    published_by: Option<UserId>,
) -> EngineResult<(Prompt, PromptVersion)> {
    let next_version = bump(&prompt.current_version, bump_kind)?;
    let version_row = PromptVersion::new(
        prompt.id,
        next_version.clone(),
        content.clone(),
        variables.clone(),
        change_note,
        published_by,
    );

    let mut updated = prompt.clone();
    updated.content = content;
    updated.variables = variables;
    updated.current_version = next_version.clone();
    updated.updated_at = chrono::Utc::now();

    info!(prompt_id = %prompt.id, version = %next_version, "publishing prompt version");
    txn.stage_version(version_row.clone());
    txn.stage_prompt(updated.clone());

    Ok((updated, version_row))
}

/// Resolves the content a render should use for `prompt`: the exact
/// published version if named, else the prompt's `current_version` row,
/// falling back to the live draft `content` if no version has been
/// published yet.
pub async fn resolve_content(
    store: &dyn PersistencePort,
    prompt: &Prompt,
    requested_version: Option<&str>,
) -> EngineResult<(String, Vec<VariableDef>, String)> {
    if let Some(version) = requested_version {
        let row = store.get_version(prompt.id, version).await?;
        return Ok((row.content, row.variables, row.version));
    }
    match store.get_version(prompt.id, &prompt.current_version).await {
        Ok(row) => Ok((row.content, row.variables, row.version)),
        Err(_) => Ok((
            prompt.content.clone(),
            prompt.variables.clone(),
            prompt.current_version.clone(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_major_resets_minor_and_patch() {
        assert_eq!(bump("1.4.9", VersionBump::Major).unwrap(), "2.0.0");
    }

    #[test]
    fn bump_minor_resets_patch_only() {
        assert_eq!(bump("1.4.9", VersionBump::Minor).unwrap(), "1.5.0");
    }

    #[test]
    fn bump_patch_increments_last_component() {
        assert_eq!(bump("1.4.9", VersionBump::Patch).unwrap(), "1.4.10");
    }

    #[test]
    fn bump_rejects_non_semver_current_version() {
        assert!(bump("not-a-version", VersionBump::Patch).is_err());
    }
}
