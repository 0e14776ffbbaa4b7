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

//! The storage seam: everything above this crate talks to a [`PersistencePort`],
//! never to `MemoryStore` directly, so a durable backend can be dropped in later
//! without touching `promptforge-engine` or `promptforge-server`.

use async_trait::async_trait;

use promptforge_core::{
    CallLog, Project, ProjectId, Prompt, PromptId, PromptRef, PromptRefId, PromptVersion, Scene,
    SceneId,
};

use crate::error::StorageResult;
use crate::txn::Txn;

#[async_trait]
pub trait PersistencePort: Send + Sync {
    /// Opens a transaction. Writes made through the returned [`Txn`] are
    /// invisible to every other reader until [`Txn::commit`] runs; dropping
    /// it uncommitted discards them, which is the rollback.
    async fn begin(&self) -> StorageResult<Txn>;

    async fn commit(&self, txn: Txn) -> StorageResult<()>;

    async fn create_project(&self, project: Project) -> StorageResult<Project>;
    async fn get_project(&self, id: ProjectId) -> StorageResult<Project>;
    async fn get_project_by_slug(&self, slug: &str) -> StorageResult<Project>;
    async fn list_projects(&self) -> StorageResult<Vec<Project>>;

    async fn get_prompt(&self, id: PromptId) -> StorageResult<Prompt>;
    async fn get_prompt_by_slug(&self, project_id: ProjectId, slug: &str) -> StorageResult<Prompt>;
    async fn list_prompts(&self, project_id: ProjectId) -> StorageResult<Vec<Prompt>>;

    async fn list_versions(&self, prompt_id: PromptId) -> StorageResult<Vec<PromptVersion>>;
    async fn get_version(&self, prompt_id: PromptId, version: &str) -> StorageResult<PromptVersion>;
    async fn get_latest_version(&self, prompt_id: PromptId) -> StorageResult<Option<PromptVersion>>;

    async fn get_ref(&self, id: PromptRefId) -> StorageResult<PromptRef>;
    async fn list_refs_by_source(&self, prompt_id: PromptId) -> StorageResult<Vec<PromptRef>>;
    async fn list_refs_by_target(&self, prompt_id: PromptId) -> StorageResult<Vec<PromptRef>>;
    async fn list_all_refs(&self) -> StorageResult<Vec<PromptRef>>;

    async fn get_scene(&self, id: SceneId) -> StorageResult<Scene>;
    async fn get_scene_by_slug(&self, project_id: ProjectId, slug: &str) -> StorageResult<Scene>;
    async fn list_scenes(&self, project_id: ProjectId) -> StorageResult<Vec<Scene>>;

    /// Best-effort: callers must not propagate a failure from this as a
    /// failure of the render or resolution it describes.
    async fn insert_call_log(&self, entry: CallLog) -> StorageResult<()>;
}
