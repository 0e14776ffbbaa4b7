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

//! Reference [`PersistencePort`] implementation backed by locked `HashMap`s.
//! Sufficient for a single-process deployment or for tests; a durable
//! backend should implement the same trait rather than extend this one.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::instrument;

use promptforge_core::{
    CallLog, Project, ProjectId, Prompt, PromptId, PromptRef, PromptRefId, PromptVersion, Scene,
    SceneId,
};

use crate::error::{StorageError, StorageResult};
use crate::port::PersistencePort;
use crate::txn::Txn;

/// A staged write, buffered inside a [`Txn`] until commit.
#[derive(Debug, Clone)]
pub(crate) enum PendingWrite {
    UpsertProject(Project),
    UpsertPrompt(Prompt),
    UpsertVersion(PromptVersion),
    UpsertRef(PromptRef),
    DeleteRef(PromptRefId),
    UpsertScene(Scene),
}

#[derive(Default)]
pub(crate) struct Shared {
    projects: RwLock<HashMap<ProjectId, Project>>,
    project_slugs: RwLock<HashMap<String, ProjectId>>,
    prompts: RwLock<HashMap<PromptId, Prompt>>,
    prompt_slugs: RwLock<HashMap<(ProjectId, String), PromptId>>,
    versions: RwLock<HashMap<PromptId, Vec<PromptVersion>>>,
    refs: RwLock<HashMap<PromptRefId, PromptRef>>,
    scenes: RwLock<HashMap<SceneId, Scene>>,
    scene_slugs: RwLock<HashMap<(ProjectId, String), SceneId>>,
    call_logs: RwLock<Vec<CallLog>>,
}

impl Shared {
    pub(crate) fn read_project(&self, id: ProjectId) -> Option<Project> {
        self.projects.read().get(&id).cloned()
    }

    pub(crate) fn read_project_by_slug(&self, slug: &str) -> Option<Project> {
        let id = *self.project_slugs.read().get(slug)?;
        self.read_project(id)
    }

    pub(crate) fn read_prompt(&self, id: PromptId) -> Option<Prompt> {
        self.prompts.read().get(&id).cloned()
    }

    pub(crate) fn read_prompt_by_slug(&self, project_id: ProjectId, slug: &str) -> Option<Prompt> {
        let id = *self
            .prompt_slugs
            .read()
            .get(&(project_id, slug.to_string()))?;
        self.read_prompt(id)
    }

    pub(crate) fn read_prompts_for_project(&self, project_id: ProjectId) -> Vec<Prompt> {
        self.prompts
            .read()
            .values()
            .filter(|p| p.project_id == project_id)
            .cloned()
            .collect()
    }

    pub(crate) fn read_versions(&self, prompt_id: PromptId) -> Vec<PromptVersion> {
        self.versions.read().get(&prompt_id).cloned().unwrap_or_default()
    }

    pub(crate) fn read_latest_version(&self, prompt_id: PromptId) -> Option<PromptVersion> {
        self.read_versions(prompt_id).into_iter().max_by(|a, b| {
            semver::Version::parse(&a.version)
                .ok()
                .cmp(&semver::Version::parse(&b.version).ok())
        })
    }

    pub(crate) fn read_ref(&self, id: PromptRefId) -> Option<PromptRef> {
        self.refs.read().get(&id).cloned()
    }

    pub(crate) fn read_refs_by_source(&self, prompt_id: PromptId) -> Vec<PromptRef> {
        self.refs
            .read()
            .values()
            .filter(|r| r.source == prompt_id)
            .cloned()
            .collect()
    }

    pub(crate) fn read_refs_by_target(&self, prompt_id: PromptId) -> Vec<PromptRef> {
        self.refs
            .read()
            .values()
            .filter(|r| r.target == prompt_id)
            .cloned()
            .collect()
    }

    pub(crate) fn read_all_refs(&self) -> Vec<PromptRef> {
        self.refs.read().values().cloned().collect()
    }

    pub(crate) fn read_scene(&self, id: SceneId) -> Option<Scene> {
        self.scenes.read().get(&id).cloned()
    }

    pub(crate) fn read_scene_by_slug(&self, project_id: ProjectId, slug: &str) -> Option<Scene> {
        let id = *self
            .scene_slugs
            .read()
            .get(&(project_id, slug.to_string()))?;
        self.read_scene(id)
    }

    pub(crate) fn read_scenes_for_project(&self, project_id: ProjectId) -> Vec<Scene> {
        self.scenes
            .read()
            .values()
            .filter(|s| s.project_id == project_id)
            .cloned()
            .collect()
    }

    pub(crate) fn apply(&self, pending: Vec<PendingWrite>) {
        for write in pending {
            match write {
                PendingWrite::UpsertProject(project) => {
                    self.project_slugs
                        .write()
                        .insert(project.slug.clone(), project.id);
                    self.projects.write().insert(project.id, project);
                }
                PendingWrite::UpsertPrompt(prompt) => {
                    self.prompt_slugs
                        .write()
                        .insert((prompt.project_id, prompt.slug.clone()), prompt.id);
                    self.prompts.write().insert(prompt.id, prompt);
                }
                PendingWrite::UpsertVersion(version) => {
                    self.versions
                        .write()
                        .entry(version.prompt_id)
                        .or_default()
                        .push(version);
                }
                PendingWrite::UpsertRef(prompt_ref) => {
                    self.refs.write().insert(prompt_ref.id, prompt_ref);
                }
                PendingWrite::DeleteRef(id) => {
                    self.refs.write().remove(&id);
                }
                PendingWrite::UpsertScene(scene) => {
                    self.scene_slugs
                        .write()
                        .insert((scene.project_id, scene.slug.clone()), scene.id);
                    self.scenes.write().insert(scene.id, scene);
                }
            }
        }
    }

    pub(crate) fn append_call_log(&self, entry: CallLog) {
        self.call_logs.write().push(entry);
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    pub(crate) shared: Arc<Shared>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersistencePort for MemoryStore {
    async fn begin(&self) -> StorageResult<Txn> {
        Ok(Txn::new(self.shared.clone()))
    }

    async fn commit(&self, txn: Txn) -> StorageResult<()> {
        txn.commit_into(&self.shared)
    }

    #[instrument(skip(self))]
    async fn create_project(&self, project: Project) -> StorageResult<Project> {
        if self.shared.read_project_by_slug(&project.slug).is_some() {
            return Err(StorageError::Conflict(format!(
                "project slug '{}' already exists",
                project.slug
            )));
        }
        self.shared.apply(vec![PendingWrite::UpsertProject(project.clone())]);
        Ok(project)
    }

    async fn get_project(&self, id: ProjectId) -> StorageResult<Project> {
        self.shared
            .read_project(id)
            .ok_or_else(|| StorageError::NotFound(format!("project {id}")))
    }

    async fn get_project_by_slug(&self, slug: &str) -> StorageResult<Project> {
        self.shared
            .read_project_by_slug(slug)
            .ok_or_else(|| StorageError::NotFound(format!("project '{slug}'")))
    }

    async fn list_projects(&self) -> StorageResult<Vec<Project>> {
        Ok(self.shared.projects.read().values().cloned().collect())
    }

    async fn get_prompt(&self, id: PromptId) -> StorageResult<Prompt> {
        self.shared
            .read_prompt(id)
            .ok_or_else(|| StorageError::NotFound(format!("prompt {id}")))
    }

    async fn get_prompt_by_slug(&self, project_id: ProjectId, slug: &str) -> StorageResult<Prompt> {
        self.shared
            .read_prompt_by_slug(project_id, slug)
            .ok_or_else(|| StorageError::NotFound(format!("prompt '{slug}'")))
    }

    async fn list_prompts(&self, project_id: ProjectId) -> StorageResult<Vec<Prompt>> {
        Ok(self.shared.read_prompts_for_project(project_id))
    }

    async fn list_versions(&self, prompt_id: PromptId) -> StorageResult<Vec<PromptVersion>> {
        Ok(self.shared.read_versions(prompt_id))
    }

    async fn get_version(&self, prompt_id: PromptId, version: &str) -> StorageResult<PromptVersion> {
        self.shared
            .read_versions(prompt_id)
            .into_iter()
            .find(|v| v.version == version)
            .ok_or_else(|| StorageError::NotFound(format!("version {version} of prompt {prompt_id}")))
    }

    async fn get_latest_version(&self, prompt_id: PromptId) -> StorageResult<Option<PromptVersion>> {
        Ok(self.shared.read_latest_version(prompt_id))
    }

    async fn get_ref(&self, id: PromptRefId) -> StorageResult<PromptRef> {
        self.shared
            .read_ref(id)
            .ok_or_else(|| StorageError::NotFound(format!("ref {id}")))
    }

    async fn list_refs_by_source(&self, prompt_id: PromptId) -> StorageResult<Vec<PromptRef>> {
        Ok(self.shared.read_refs_by_source(prompt_id))
    }

    async fn list_refs_by_target(&self, prompt_id: PromptId) -> StorageResult<Vec<PromptRef>> {
        Ok(self.shared.read_refs_by_target(prompt_id))
    }

    async fn list_all_refs(&self) -> StorageResult<Vec<PromptRef>> {
        Ok(self.shared.read_all_refs())
    }

    async fn get_scene(&self, id: SceneId) -> StorageResult<Scene> {
        self.shared
            .read_scene(id)
            .ok_or_else(|| StorageError::NotFound(format!("scene {id}")))
    }

    async fn get_scene_by_slug(&self, project_id: ProjectId, slug: &str) -> StorageResult<Scene> {
        self.shared
            .read_scene_by_slug(project_id, slug)
            .ok_or_else(|| StorageError::NotFound(format!("scene '{slug}'")))
    }

    async fn list_scenes(&self, project_id: ProjectId) -> StorageResult<Vec<Scene>> {
        Ok(self.shared.read_scenes_for_project(project_id))
    }

    async fn insert_call_log(&self, entry: CallLog) -> StorageResult<()> {
        self.shared.append_call_log(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptforge_core::Project;

    #[tokio::test]
    async fn create_project_rejects_duplicate_slug() {
        let store = MemoryStore::new();
        let project = Project::new("demo", "Demo", None);
        store.create_project(project.clone()).await.unwrap();

        let dup = Project::new("demo", "Demo Again", None);
        let err = store.create_project(dup).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));
    }

    #[tokio::test]
    async fn txn_writes_are_invisible_until_commit() {
        let store = MemoryStore::new();
        let project = Project::new("demo", "Demo", None);
        let project_id = project.id;
        store.create_project(project.clone()).await.unwrap();

        let prompt = Prompt::new(project_id, "greeting", "Greeting", "hi {{ name }}", vec![], None);
        let prompt_id = prompt.id;

        let mut txn = store.begin().await.unwrap();
        txn.stage_prompt(prompt);
        assert!(store.get_prompt(prompt_id).await.is_err());

        store.commit(txn).await.unwrap();
        assert!(store.get_prompt(prompt_id).await.is_ok());
    }

    #[tokio::test]
    async fn dropping_uncommitted_txn_discards_its_writes() {
        let store = MemoryStore::new();
        let project = Project::new("demo", "Demo", None);
        let project_id = project.id;
        store.create_project(project).await.unwrap();

        let prompt = Prompt::new(project_id, "greeting", "Greeting", "hi {{ name }}", vec![], None);
        let prompt_id = prompt.id;
        {
            let mut txn = store.begin().await.unwrap();
            txn.stage_prompt(prompt);
        }
        assert!(store.get_prompt(prompt_id).await.is_err());
    }
}
