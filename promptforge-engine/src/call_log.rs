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

//! The Call Logger: records what a render or scene resolution produced.
//! A storage failure here is swallowed — observability must never take
//! down the operation it's observing.

use promptforge_core::CallLog;
use promptforge_storage::PersistencePort;
use tracing::warn;

pub async fn record(store: &dyn PersistencePort, entry: CallLog) {
    if let Err(err) = store.insert_call_log(entry).await {
        warn!(error = %err, "failed to persist call log entry");
    }
}
