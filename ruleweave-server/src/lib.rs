// Copyright 2025 Ruleweave Contributors (https://github.com/ruleweave)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Ruleweave Server
//!
//! The HTTP face of Ruleweave: one compose endpoint over the graph querier,
//! plus health probes. The entity-store connection is attempted once at
//! startup; on failure the server still comes up, but compose requests
//! answer 503 until the process is restarted with a reachable store.

pub mod api;
pub mod config;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use ruleweave_graph::store::Neo4jStore;
use ruleweave_graph::GraphQuerier;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{compose_rule, health_check, health_check_detailed, AppState};
use config::ServerConfig;

/// Build the router; split out so tests can drive it without binding a port.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/health", get(health_check_detailed))
        .route("/api/v1/rules/compose", post(compose_rule))
        .with_state(state)
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ruleweave_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Ruleweave server");

    config.validate()?;

    // One connection attempt at startup; no retry loop. A dead store
    // degrades the whole service to 503 instead of serving wrong answers.
    let querier = match Neo4jStore::connect(&config.graph).await {
        Ok(store) => {
            tracing::info!("Connected to entity store at {}", config.graph.uri);
            Some(Arc::new(GraphQuerier::new(Arc::new(store))))
        }
        Err(e) => {
            tracing::error!(
                "Failed to connect to entity store at {}: {}. Compose requests will answer 503.",
                config.graph.uri,
                e
            );
            None
        }
    };

    let state = AppState { querier };

    let router = app(state)
        .layer(if config.server.enable_cors {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            CorsLayer::new()
        })
        .layer(TraceLayer::new_for_http());

    let addr = config.socket_addr()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
