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

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("transaction already closed")]
    TxnClosed,

    #[error("backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for promptforge_core::CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => promptforge_core::CoreError::NotFound(msg),
            StorageError::Conflict(msg) => promptforge_core::CoreError::Conflict(msg),
            other => promptforge_core::CoreError::Validation(other.to_string()),
        }
    }
}
