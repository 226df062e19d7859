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
use ruleweave_extract::{ExtractorConfig, LlmConfig};
use ruleweave_graph::store::Neo4jConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Ingestion pipeline configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IngestConfig {
    #[serde(default)]
    pub graph: Neo4jConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub extractor: ExtractorConfig,
}

impl IngestConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with priority: env > file > defaults
    ///
    /// Environment variables: `NEO4J_URI` / `NEO4J_USER` / `NEO4J_PASSWORD` /
    /// `NEO4J_DATABASE`, `OPENAI_API_KEY` / `ANTHROPIC_API_KEY` /
    /// `OLLAMA_BASE_URL`, and `RULEWEAVE_LLM_PROVIDER` for the extractor's
    /// provider id.
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
        self.graph.apply_env();
        self.llm.apply_env();
        if let Ok(provider) = std::env::var("RULEWEAVE_LLM_PROVIDER") {
            self.extractor.provider_id = provider;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = IngestConfig::default();
        assert_eq!(config.graph.uri, "http://localhost:7474");
        assert_eq!(config.extractor.provider_id, "openai");
        assert!(config.llm.openai_api_key.is_none());
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [graph]
            uri = "http://graph:7474"
            password = "secret"

            [extractor]
            provider_id = "ollama"
            model = "llama3"
            "#
        )
        .unwrap();

        let config = IngestConfig::from_file(file.path()).unwrap();
        assert_eq!(config.graph.uri, "http://graph:7474");
        assert_eq!(config.extractor.provider_id, "ollama");
        assert_eq!(config.extractor.model.as_deref(), Some("llama3"));
        assert_eq!(config.extractor.max_fragments, 32);
    }

    #[test]
    fn test_provider_env_override() {
        std::env::set_var("RULEWEAVE_LLM_PROVIDER", "anthropic");

        let config = IngestConfig::load(None).unwrap();
        assert_eq!(config.extractor.provider_id, "anthropic");

        std::env::remove_var("RULEWEAVE_LLM_PROVIDER");
    }
}
