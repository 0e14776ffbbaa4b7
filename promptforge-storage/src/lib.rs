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

//! Storage seam for PromptForge: a backend-agnostic [`PersistencePort`] trait
//! plus an in-memory implementation suitable for a single-process deployment
//! or for tests.

pub mod error;
pub mod memory;
pub mod port;
pub mod txn;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use port::PersistencePort;
pub use txn::Txn;
