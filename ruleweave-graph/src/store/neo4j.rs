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

//! Neo4j HTTP Store
//!
//! A [`GraphStore`] over Neo4j's transactional HTTP endpoint
//! (`POST {uri}/db/{database}/tx/commit`). Each operation is one
//! self-committing round trip; statement text comes from
//! [`cypher`](super::cypher) with all values bound as parameters.
//!
//! The connection is owned explicitly: [`Neo4jStore::connect`] verifies the
//! store answers a trivial read once at startup, and the resulting store is
//! held by whoever runs the request path. There are no retries here; a failed
//! operation fails the surrounding request.

use super::cypher::{self, CypherStatement};
use super::{GraphStore, GraphWrite, RetrievalQuery};
use crate::error::GraphError;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::debug;

/// Connection settings for the entity store.
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct Neo4jConfig {
    /// Base URI of the Neo4j HTTP API (e.g., "http://localhost:7474")
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Database to address on the server
    #[serde(default = "default_database")]
    pub database: String,
}

fn default_uri() -> String {
    "http://localhost:7474".to_string()
}

fn default_username() -> String {
    "neo4j".to_string()
}

fn default_database() -> String {
    "neo4j".to_string()
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            username: default_username(),
            password: String::new(),
            database: default_database(),
        }
    }
}

impl Neo4jConfig {
    /// Override fields from `NEO4J_URI`, `NEO4J_USER`, `NEO4J_PASSWORD` and
    /// `NEO4J_DATABASE` when set.
    pub fn apply_env(&mut self) {
        if let Ok(uri) = std::env::var("NEO4J_URI") {
            self.uri = uri;
        }
        if let Ok(username) = std::env::var("NEO4J_USER") {
            self.username = username;
        }
        if let Ok(password) = std::env::var("NEO4J_PASSWORD") {
            self.password = password;
        }
        if let Ok(database) = std::env::var("NEO4J_DATABASE") {
            self.database = database;
        }
    }

    fn commit_url(&self) -> String {
        format!(
            "{}/db/{}/tx/commit",
            self.uri.trim_end_matches('/'),
            self.database
        )
    }
}

/// Entity store backed by a Neo4j server.
pub struct Neo4jStore {
    client: reqwest::Client,
    commit_url: String,
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    #[serde(default)]
    results: Vec<CommitResult>,
    #[serde(default)]
    errors: Vec<Neo4jServerError>,
}

#[derive(Debug, Deserialize)]
struct CommitResult {
    #[serde(default)]
    data: Vec<CommitRow>,
}

#[derive(Debug, Deserialize)]
struct CommitRow {
    #[serde(default)]
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Neo4jServerError {
    code: String,
    message: String,
}

impl Neo4jStore {
    /// Build a client without touching the network.
    pub fn new(config: &Neo4jConfig) -> Result<Self, GraphError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            commit_url: config.commit_url(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Build a client and verify the store answers a trivial read.
    pub async fn connect(config: &Neo4jConfig) -> Result<Self, GraphError> {
        let store = Self::new(config)?;
        store
            .commit(CypherStatement {
                statement: "RETURN 1".to_string(),
                parameters: Map::new(),
            })
            .await?;
        Ok(store)
    }

    /// Run one statement in a self-committing transaction and return the raw
    /// result rows.
    async fn commit(&self, statement: CypherStatement) -> Result<Vec<Vec<Value>>, GraphError> {
        let body = json!({
            "statements": [{
                "statement": statement.statement,
                "parameters": statement.parameters,
            }]
        });

        let response = self
            .client
            .post(&self.commit_url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GraphError::Store {
                code: format!("Neo.Http.{}", status.as_u16()),
                message,
            });
        }

        let payload: CommitResponse = response.json().await?;

        // The endpoint reports statement failures in-band with a 200 status.
        if let Some(err) = payload.errors.into_iter().next() {
            return Err(GraphError::Store {
                code: err.code,
                message: err.message,
            });
        }

        let result = payload.results.into_iter().next().ok_or_else(|| {
            GraphError::InvalidResponse("commit response carried no result set".to_string())
        })?;

        Ok(result.data.into_iter().map(|r| r.row).collect())
    }
}

#[async_trait::async_trait]
impl GraphStore for Neo4jStore {
    async fn upsert(&self, write: &GraphWrite) -> Result<(), GraphError> {
        debug!(label = write.kind.label(), name = %write.name, "upserting entity node");
        self.commit(cypher::upsert_statement(write)).await?;
        Ok(())
    }

    async fn retrieve(&self, query: &RetrievalQuery) -> Result<Vec<Option<String>>, GraphError> {
        if query.is_empty() {
            // An empty union renders to an empty statement; nothing to ask.
            return Ok(Vec::new());
        }

        let statement = cypher::retrieval_statement(query);
        debug!(statement = %statement.statement, "executing aggregation read");

        let rows = self.commit(statement).await?;
        Ok(rows
            .into_iter()
            .map(|row| row.into_iter().next().map(cell_to_content).unwrap_or(None))
            .collect())
    }
}

fn cell_to_content(cell: Value) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_url_includes_database() {
        let config = Neo4jConfig {
            uri: "http://graph.internal:7474/".to_string(),
            database: "rules".to_string(),
            ..Neo4jConfig::default()
        };
        assert_eq!(
            config.commit_url(),
            "http://graph.internal:7474/db/rules/tx/commit"
        );
    }

    #[test]
    fn env_overrides_config() {
        std::env::set_var("NEO4J_URI", "http://override:7474");
        std::env::set_var("NEO4J_USER", "svc");

        let mut config = Neo4jConfig::default();
        config.apply_env();
        assert_eq!(config.uri, "http://override:7474");
        assert_eq!(config.username, "svc");
        assert_eq!(config.database, "neo4j");

        std::env::remove_var("NEO4J_URI");
        std::env::remove_var("NEO4J_USER");
    }

    #[test]
    fn null_cells_stay_null_until_filtered() {
        assert_eq!(cell_to_content(Value::Null), None);
        assert_eq!(
            cell_to_content(Value::String("S1".into())),
            Some("S1".to_string())
        );
    }
}
