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

//! A transaction stages writes in memory; nothing becomes visible to other
//! callers until [`MemoryStore::commit`](crate::memory::MemoryStore::commit)
//! runs. Dropping a `Txn` without committing just discards the stage.

use std::sync::Arc;

use tracing::warn;

use promptforge_core::{Prompt, PromptId, PromptRef, PromptRefId, PromptVersion, Scene};

use crate::error::StorageResult;
use crate::memory::{PendingWrite, Shared};

pub struct Txn {
    shared: Arc<Shared>,
    pending: Vec<PendingWrite>,
    committed: bool,
}

impl Txn {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self {
            shared,
            pending: Vec::new(),
            committed: false,
        }
    }

    pub fn stage_prompt(&mut self, prompt: Prompt) {
        self.pending.push(PendingWrite::UpsertPrompt(prompt));
    }

    pub fn stage_version(&mut self, version: PromptVersion) {
        self.pending.push(PendingWrite::UpsertVersion(version));
    }

    pub fn stage_ref(&mut self, prompt_ref: PromptRef) {
        self.pending.push(PendingWrite::UpsertRef(prompt_ref));
    }

    pub fn stage_ref_deletion(&mut self, id: PromptRefId) {
        self.pending.push(PendingWrite::DeleteRef(id));
    }

    pub fn stage_scene(&mut self, scene: Scene) {
        self.pending.push(PendingWrite::UpsertScene(scene));
    }

    /// Reads see this transaction's own uncommitted writes layered over the
    /// committed store, last-write-wins, so a multi-step operation (create a
    /// prompt, then a ref pointing at it) can see its own prior steps.
    pub fn get_prompt(&self, id: PromptId) -> Option<Prompt> {
        for write in self.pending.iter().rev() {
            if let PendingWrite::UpsertPrompt(p) = write {
                if p.id == id {
                    return Some(p.clone());
                }
            }
        }
        self.shared.read_prompt(id)
    }

    pub fn list_all_refs(&self) -> Vec<PromptRef> {
        let mut refs = self.shared.read_all_refs();
        for write in &self.pending {
            match write {
                PendingWrite::UpsertRef(r) => {
                    refs.retain(|existing| existing.id != r.id);
                    refs.push(r.clone());
                }
                PendingWrite::DeleteRef(id) => refs.retain(|r| r.id != *id),
                _ => {}
            }
        }
        refs
    }

    pub(crate) fn commit_into(mut self, shared: &Arc<Shared>) -> StorageResult<()> {
        debug_assert!(Arc::ptr_eq(&self.shared, shared));
        shared.apply(std::mem::take(&mut self.pending));
        self.committed = true;
        Ok(())
    }
}

impl Drop for Txn {
    fn drop(&mut self) {
        if !self.committed && !self.pending.is_empty() {
            warn!(staged = self.pending.len(), "transaction dropped without commit, rolling back");
        }
    }
}
