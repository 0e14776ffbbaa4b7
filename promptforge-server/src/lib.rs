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

//! The HTTP surface: routing, request authentication, and the JSON
//! envelope every handler responds with. Everything here is a thin
//! adapter over `promptforge-engine`/`promptforge-storage` — no business
//! logic lives in a handler.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;

use std::sync::Arc;

use anyhow::Context;

use promptforge_storage::{MemoryStore, PersistencePort};

use crate::api::{build_router, AppState};
use crate::auth::{Authenticator, NoAuth, StaticTokenAuth};
use crate::config::ServerConfig;

/// Builds the `AppState` for `config`: an in-memory store and whichever
/// authenticator the configured tokens imply.
pub fn build_state(config: &ServerConfig) -> AppState {
    let store: Arc<dyn PersistencePort> = Arc::new(MemoryStore::new());
    let authenticator: Arc<dyn Authenticator> = if config.auth.require_auth {
        Arc::new(StaticTokenAuth::new(config.auth.tokens.clone()))
    } else {
        Arc::new(NoAuth)
    };
    AppState { store, authenticator }
}

/// Binds and serves the HTTP API until the process is signaled to stop.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let state = build_state(&config);
    let router = build_router(state, &config);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "promptforge-server listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

/// Resolves on Ctrl-C (or SIGTERM on unix), letting in-flight requests drain
/// before the listener stops accepting new ones.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, draining connections");
}
