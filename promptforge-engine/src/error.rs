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

use promptforge_core::{CoreError, TemplateError};
use promptforge_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("dependency cycle: {0}")]
    Cycle(String),

    #[error("invalid version bump from '{current}': {reason}")]
    InvalidBump { current: String, reason: String },
}

pub type EngineResult<T> = Result<T, EngineError>;

impl From<EngineError> for CoreError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Core(e) => e,
            EngineError::Template(e) => CoreError::TemplateRender(e),
            EngineError::Storage(e) => e.into(),
            EngineError::Cycle(msg) => CoreError::CycleDetected(msg),
            EngineError::InvalidBump { current, reason } => {
                CoreError::Validation(format!("cannot bump version '{current}': {reason}"))
            }
        }
    }
}
