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

use anyhow::Result;
use ruleweave_graph::store::Neo4jConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Ruleweave Server Configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub graph: Neo4jConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpServerConfig {
    /// HTTP API listen address (e.g., "127.0.0.1:8002")
    #[serde(default = "default_http_addr")]
    pub listen_addr: String,

    /// Enable CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

fn default_http_addr() -> String {
    "127.0.0.1:8002".to_string()
}

fn default_enable_cors() -> bool {
    true
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_http_addr(),
            enable_cors: default_enable_cors(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::default(),
            graph: Neo4jConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with priority: env > file > defaults
    ///
    /// Supported environment variables:
    /// - RULEWEAVE_HTTP_ADDR: HTTP listen address (default: 127.0.0.1:8002)
    /// - RULEWEAVE_ENABLE_CORS: Enable CORS (default: true)
    /// - NEO4J_URI / NEO4J_USER / NEO4J_PASSWORD / NEO4J_DATABASE
    pub fn load(config_file: Option<PathBuf>) -> Result<Self> {
        let mut config = if let Some(path) = config_file {
            if path.exists() {
                tracing::info!("Loading configuration from file: {:?}", path);
                Self::from_file(&path)?
            } else {
                tracing::warn!("Config file not found: {:?}, using defaults", path);
                Self::default()
            }
        } else {
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(addr) = std::env::var("RULEWEAVE_HTTP_ADDR") {
            self.server.listen_addr = addr;
        }
        if let Ok(cors) = std::env::var("RULEWEAVE_ENABLE_CORS") {
            self.server.enable_cors = cors.parse().unwrap_or(true);
        }
        self.graph.apply_env();
    }

    /// Parse listen address as SocketAddr
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(self.server.listen_addr.parse()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.server.listen_addr, "127.0.0.1:8002");
        assert!(config.server.enable_cors);
        assert_eq!(config.graph.uri, "http://localhost:7474");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("RULEWEAVE_HTTP_ADDR", "0.0.0.0:8080");

        let config = ServerConfig::load(None).unwrap();
        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");

        std::env::remove_var("RULEWEAVE_HTTP_ADDR");
    }

    #[test]
    fn test_from_toml() {
        let config: ServerConfig = toml::from_str(
            r#"
            [server]
            listen_addr = "127.0.0.1:9000"

            [graph]
            uri = "http://graph:7474"
            username = "neo4j"
            password = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.graph.password, "secret");
        assert_eq!(config.graph.database, "neo4j");
    }

    #[test]
    fn test_invalid_listen_addr_fails_validation() {
        let config = ServerConfig {
            server: HttpServerConfig {
                listen_addr: "not-an-address".to_string(),
                enable_cors: true,
            },
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
