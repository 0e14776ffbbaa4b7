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

//! The response envelope every handler — success or error — wraps its body
//! in: `{code, message, data, meta?}`, `code = 0` meaning success and any
//! other value one of the §7 error codes.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationMeta>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: 0,
            message: "success".to_string(),
            data,
            meta: None,
        }
    }

    pub fn paginated(data: T, meta: PaginationMeta) -> Self {
        Self {
            code: 0,
            message: "success".to_string(),
            data,
            meta: Some(meta),
        }
    }
}

/// Query parameters accepted by every list endpoint. 1-indexed, per §6.
///
/// `project_id` scopes listings that aren't nested under `/projects/:id/...`
/// in the route path (e.g. the flat `GET /api/v1/scenes`).
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub project_id: Option<String>,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    50
}

/// Slices `items` to the requested 1-indexed page, returning the page plus
/// pagination metadata (`total_pages = ceil(total/page_size)`) for the full,
/// unsliced collection.
pub fn paginate<T: Clone>(items: Vec<T>, params: &ListParams) -> (Vec<T>, PaginationMeta) {
    let total = items.len();
    let page = params.page.max(1);
    let page_size = params.page_size.max(1);
    let offset = (page - 1) * page_size;
    let slice = items.into_iter().skip(offset).take(page_size).collect();
    let total_pages = (total + page_size - 1) / page_size;
    (
        slice,
        PaginationMeta {
            page,
            page_size,
            total,
            total_pages,
        },
    )
}
