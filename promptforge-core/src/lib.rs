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

//! Shared entity model, value type, and error taxonomy for PromptForge.
//!
//! This crate has no knowledge of storage or HTTP — it is the vocabulary
//! every other crate in the workspace builds on.

pub mod call_log;
pub mod error;
pub mod ids;
pub mod project;
pub mod prompt;
pub mod prompt_ref;
pub mod scene;
pub mod value;
pub mod variable;
pub mod version;

pub use call_log::CallLog;
pub use error::{CoreError, CoreResult, TemplateError};
pub use ids::{CallLogId, ProjectId, PromptId, PromptRefId, PromptVersionId, SceneId, UserId};
pub use project::Project;
pub use prompt::Prompt;
pub use prompt_ref::PromptRef;
pub use scene::{ConditionOperator, MergeStrategy, PipelineConfig, PipelineStep, Scene, StepCondition};
pub use value::{Value, VarMap};
pub use variable::VariableDef;
pub use version::{PromptVersion, VersionBump};
