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

use super::{ChatMessage, LlmProvider};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client as OpenAIClient,
};
use serde_json::json;

// OpenAI Provider
pub struct OpenAiProvider {
    client: OpenAIClient<OpenAIConfig>,
}

impl OpenAiProvider {
    pub fn new(api_key: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: OpenAIClient::with_config(config),
        }
    }

    fn convert_messages(&self, messages: Vec<ChatMessage>) -> Vec<ChatCompletionRequestMessage> {
        messages
            .into_iter()
            .filter_map(|msg| match msg.role.as_str() {
                "system" => ChatCompletionRequestSystemMessageArgs::default()
                    .content(msg.content)
                    .build()
                    .ok()
                    .map(ChatCompletionRequestMessage::System),
                "user" => ChatCompletionRequestUserMessageArgs::default()
                    .content(msg.content)
                    .build()
                    .ok()
                    .map(ChatCompletionRequestMessage::User),
                "assistant" => ChatCompletionRequestAssistantMessageArgs::default()
                    .content(msg.content)
                    .build()
                    .ok()
                    .map(ChatCompletionRequestMessage::Assistant),
                _ => None,
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiProvider {
    async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        model: Option<String>,
    ) -> anyhow::Result<String> {
        let model_name = model.unwrap_or_else(|| "gpt-4o-mini".to_string());

        let request = CreateChatCompletionRequestArgs::default()
            .model(&model_name)
            .messages(self.convert_messages(messages))
            .build()?;

        let response = self.client.chat().create(request).await?;

        Ok(response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "OpenAI"
    }
}

// Anthropic Provider
pub struct AnthropicProvider {
    api_key: String,
}

impl AnthropicProvider {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }
}

#[async_trait::async_trait]
impl LlmProvider for AnthropicProvider {
    async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        model: Option<String>,
    ) -> anyhow::Result<String> {
        let model_name = model.unwrap_or_else(|| "claude-3-5-sonnet-20241022".to_string());

        let client = reqwest::Client::new();

        // Anthropic takes the system prompt as a top-level field, not a
        // message role.
        let system: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == "system")
            .map(|m| m.content.as_str())
            .collect();
        let formatted_messages: Vec<_> = messages
            .iter()
            .filter(|m| m.role != "system")
            .map(|m| json!({"role": m.role, "content": m.content}))
            .collect();

        let body = json!({
            "model": model_name,
            "system": system.join("\n"),
            "messages": formatted_messages,
            "max_tokens": 4096,
        });

        let response = client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let json: serde_json::Value = response.json().await?;

        if let Some(error) = json.get("error") {
            anyhow::bail!("Anthropic API error: {}", error);
        }

        Ok(json["content"][0]["text"]
            .as_str()
            .unwrap_or("")
            .to_string())
    }

    fn name(&self) -> &str {
        "Anthropic"
    }
}

// Ollama Provider (local)
pub struct OllamaProvider {
    base_url: String,
}

impl OllamaProvider {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }
}

#[async_trait::async_trait]
impl LlmProvider for OllamaProvider {
    async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        model: Option<String>,
    ) -> anyhow::Result<String> {
        let model_name = model.unwrap_or_else(|| "llama3".to_string());

        let client = reqwest::Client::new();

        let formatted_messages: Vec<_> = messages
            .iter()
            .map(|m| json!({"role": m.role, "content": m.content}))
            .collect();

        let body = json!({
            "model": model_name,
            "messages": formatted_messages,
            "stream": false,
        });

        let response = client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await?;

        let json: serde_json::Value = response.json().await?;

        Ok(json["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string())
    }

    fn name(&self) -> &str {
        "Ollama"
    }
}
