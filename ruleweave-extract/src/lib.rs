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

//! Ruleweave Extract
//!
//! Turns raw rule documents into entity-tagged fragments with a language
//! model. Supports OpenAI, Anthropic and Ollama behind one provider trait;
//! providers are registered from configuration when their credentials are
//! present.
//!
//! Extraction is deliberately non-fatal: any failure (missing provider,
//! network error, malformed model output) yields an empty fragment list, and
//! callers treat "no result" as "skip this document".

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

pub mod extractor;
pub mod providers;

pub use extractor::{ExtractorConfig, FragmentExtractor};
pub use providers::{AnthropicProvider, OllamaProvider, OpenAiProvider};

/// One chat turn sent to a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Provider credentials and endpoints, usually filled from the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Anthropic API key
    pub anthropic_api_key: Option<String>,

    /// Ollama base URL (e.g., "http://localhost:11434")
    pub ollama_base_url: Option<String>,
}

impl LlmConfig {
    /// Override fields from `OPENAI_API_KEY`, `ANTHROPIC_API_KEY` and
    /// `OLLAMA_BASE_URL` when set.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            self.anthropic_api_key = Some(key);
        }
        if let Ok(base_url) = std::env::var("OLLAMA_BASE_URL") {
            self.ollama_base_url = Some(base_url);
        }
    }
}

/// A chat-capable language model endpoint.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Run one chat completion and return the assistant's text content.
    async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        model: Option<String>,
    ) -> anyhow::Result<String>;

    fn name(&self) -> &str;
}

/// Registry of configured providers, keyed by id ("openai", "anthropic",
/// "ollama").
pub struct LlmProviderManager {
    providers: DashMap<String, Arc<dyn LlmProvider>>,
}

impl LlmProviderManager {
    /// Register every provider whose configuration is present.
    pub fn new(config: &LlmConfig) -> Self {
        let manager = Self {
            providers: DashMap::new(),
        };

        if let Some(key) = &config.openai_api_key {
            manager.register("openai", Arc::new(OpenAiProvider::new(key.clone())));
            info!("Initialized OpenAI provider");
        } else {
            warn!("OPENAI_API_KEY not set, OpenAI provider disabled");
        }

        if let Some(key) = &config.anthropic_api_key {
            manager.register("anthropic", Arc::new(AnthropicProvider::new(key.clone())));
            info!("Initialized Anthropic provider");
        } else {
            warn!("ANTHROPIC_API_KEY not set, Anthropic provider disabled");
        }

        if let Some(base_url) = &config.ollama_base_url {
            manager.register("ollama", Arc::new(OllamaProvider::new(base_url.clone())));
            info!("Initialized Ollama provider");
        }

        manager
    }

    /// Add or replace a provider under an id.
    pub fn register(&self, id: impl Into<String>, provider: Arc<dyn LlmProvider>) {
        self.providers.insert(id.into(), provider);
    }

    pub fn has_provider(&self, id: &str) -> bool {
        self.providers.contains_key(id)
    }

    pub fn list_providers(&self) -> Vec<String> {
        self.providers.iter().map(|e| e.key().clone()).collect()
    }

    /// Dispatch a chat call to the provider registered under `provider_id`.
    pub async fn chat(
        &self,
        provider_id: &str,
        model: Option<String>,
        messages: Vec<ChatMessage>,
    ) -> anyhow::Result<String> {
        // Clone the Arc out so the map shard is not held across the await.
        let provider = self
            .providers
            .get(provider_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| anyhow::anyhow!("Provider not found: {}", provider_id))?;

        provider.chat(messages, model).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_registers_nothing() {
        let manager = LlmProviderManager::new(&LlmConfig::default());
        assert!(manager.list_providers().is_empty());
        assert!(!manager.has_provider("openai"));
    }

    #[test]
    fn registers_providers_with_credentials() {
        let config = LlmConfig {
            openai_api_key: Some("sk-test".into()),
            anthropic_api_key: None,
            ollama_base_url: Some("http://localhost:11434".into()),
        };
        let manager = LlmProviderManager::new(&config);
        assert!(manager.has_provider("openai"));
        assert!(manager.has_provider("ollama"));
        assert!(!manager.has_provider("anthropic"));
    }

    #[tokio::test]
    async fn chat_with_unknown_provider_fails() {
        let manager = LlmProviderManager::new(&LlmConfig::default());
        let err = manager
            .chat("openai", None, vec![ChatMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Provider not found"));
    }
}
