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

//! The algorithmic core of PromptForge: template rendering, version
//! bumping, dependency resolution, scene validation, and scene resolution.
//! Everything here is storage-agnostic — it talks to a
//! `promptforge_storage::PersistencePort`, never to a concrete backend.

pub mod call_log;
pub mod error;
pub mod graph;
pub mod graph_export;
pub mod prompt_ops;
pub mod render;
pub mod resolve;
pub mod scene_validate;
pub mod version;

pub use error::{EngineError, EngineResult};
pub use resolve::{resolve_scene, SceneResolution, StepResult};
