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

//! Server configuration, loaded from the environment with sane defaults
//! for local development. Every field has a `PROMPTFORGE_*` override.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub http: HttpServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Auth is a thin static-token scheme: the HTTP surface authenticates
/// callers, not individual end users — authorization within a project is
/// a collaborating system's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub require_auth: bool,
    #[serde(default)]
    pub tokens: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            require_auth: false,
            tokens: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Builds config from defaults overridden by environment variables.
    /// `PROMPTFORGE_API_TOKENS` is a comma-separated list; its presence
    /// implies `require_auth = true` unless overridden explicitly.
    pub fn from_env() -> Self {
        let mut config = Self {
            http: HttpServerConfig::default(),
            auth: AuthConfig::default(),
        };

        if let Ok(addr) = std::env::var("PROMPTFORGE_BIND_ADDR") {
            config.http.bind_addr = addr;
        }
        if let Ok(port) = std::env::var("PROMPTFORGE_PORT") {
            if let Ok(parsed) = port.parse() {
                config.http.port = parsed;
            }
        }
        if let Ok(secs) = std::env::var("PROMPTFORGE_REQUEST_TIMEOUT_SECS") {
            if let Ok(parsed) = secs.parse() {
                config.http.request_timeout_secs = parsed;
            }
        }
        if let Ok(tokens) = std::env::var("PROMPTFORGE_API_TOKENS") {
            config.auth.tokens = tokens
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            config.auth.require_auth = !config.auth.tokens.is_empty();
        }
        if let Ok(flag) = std::env::var("PROMPTFORGE_REQUIRE_AUTH") {
            config.auth.require_auth = flag == "1" || flag.eq_ignore_ascii_case("true");
        }

        config
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.http.bind_addr, self.http.port)
    }
}
