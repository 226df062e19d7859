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

//! Fragment Extraction
//!
//! Decomposes a rule document into entity-tagged fragments via an LLM call.
//!
//! ## Extraction Process
//!
//! 1. Build a prompt with the fixed entity-type vocabulary and a few-shot
//!    example
//! 2. Call the configured provider
//! 3. Locate the JSON array in the response and deserialize it
//! 4. Drop fragments whose entity type is outside the accepted enumeration
//!
//! Every failure mode collapses to an empty fragment list; ingestion skips
//! the document and moves on.

use crate::{ChatMessage, LlmProviderManager};
use ruleweave_core::{EntityKind, Fragment};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Configuration for the fragment extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Provider id to dispatch to (e.g., "openai", "ollama")
    #[serde(default = "default_provider")]
    pub provider_id: String,

    /// Model override; `None` uses the provider's default
    #[serde(default)]
    pub model: Option<String>,

    /// Maximum fragments accepted per document
    #[serde(default = "default_max_fragments")]
    pub max_fragments: usize,
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_max_fragments() -> usize {
    32
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            provider_id: default_provider(),
            model: None,
            max_fragments: default_max_fragments(),
        }
    }
}

/// LLM-backed rule fragment extractor.
pub struct FragmentExtractor {
    config: ExtractorConfig,
    llm: Arc<LlmProviderManager>,
}

impl FragmentExtractor {
    pub fn new(llm: Arc<LlmProviderManager>, config: ExtractorConfig) -> Self {
        Self { config, llm }
    }

    /// Extract fragments from one document. Failures yield an empty list.
    pub async fn extract(&self, document: &str) -> Vec<Fragment> {
        match self.try_extract(document).await {
            Ok(fragments) => {
                debug!(count = fragments.len(), "extracted rule fragments");
                fragments
            }
            Err(e) => {
                warn!("fragment extraction failed, treating document as empty: {e:#}");
                Vec::new()
            }
        }
    }

    async fn try_extract(&self, document: &str) -> anyhow::Result<Vec<Fragment>> {
        let messages = vec![
            ChatMessage::system(
                "You are an expert data extraction bot. Your task is to read a text and \
                 identify all individual rule fragments. A fragment is a specific rule tied \
                 to a single entity like a state, a form, or a property type. Deconstruct \
                 the text into a list of these fragments. Output only valid JSON.",
            ),
            ChatMessage::user(build_extraction_prompt(document)),
        ];

        let response = self
            .llm
            .chat(&self.config.provider_id, self.config.model.clone(), messages)
            .await?;

        let mut fragments = parse_fragments(&response)?;
        fragments.truncate(self.config.max_fragments);
        Ok(fragments)
    }
}

/// Build the extraction prompt with the entity vocabulary and a worked
/// example. The example keeps small models honest about the output shape.
fn build_extraction_prompt(document: &str) -> String {
    let vocabulary = EntityKind::ALL
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Extract all rule fragments from the rule document below.

## VALID ENTITY TYPES (use EXACTLY these)
{vocabulary}

## OUTPUT SHAPE
Each fragment is an object:
{{"entityType": "<one of the valid types>", "entityName": "<short name>", "content": "<the rule text that applies to this entity>"}}

## EXAMPLE

Input: "In Florida, residential policies must attach form 03 at issuance."
Output:
```json
[
  {{"entityType": "state", "entityName": "Florida", "content": "Residential policies in Florida must attach form 03 at issuance."}},
  {{"entityType": "property", "entityName": "Residential", "content": "Residential policies must attach form 03 at issuance."}},
  {{"entityType": "form", "entityName": "03", "content": "Form 03 is required at issuance for residential policies in Florida."}}
]
```

## YOUR INPUT DOCUMENT
{document}

## OUTPUT
Return ONLY a valid JSON array. No markdown code blocks, no explanation, just the raw JSON array:
[...]"#
    )
}

/// Parse fragments out of a model response that may wrap the JSON array in
/// prose or a code fence.
fn parse_fragments(response: &str) -> anyhow::Result<Vec<Fragment>> {
    let json_start = response.find('[');
    let json_end = response.rfind(']');

    let json_str = match (json_start, json_end) {
        (Some(start), Some(end)) if end > start => &response[start..=end],
        _ => {
            warn!("no JSON array found in model response");
            return Ok(Vec::new());
        }
    };

    let raw: Vec<Fragment> = serde_json::from_str(json_str)
        .map_err(|e| anyhow::anyhow!("failed to parse fragments JSON: {}", e))?;

    Ok(raw
        .into_iter()
        .filter(|fragment| {
            if fragment.entity_name.is_empty() || fragment.content.is_empty() {
                warn!("dropping fragment with empty fields");
                return false;
            }
            if fragment.entity_type.parse::<EntityKind>().is_err() {
                warn!(
                    entity_type = %fragment.entity_type,
                    "dropping fragment with unknown entity type"
                );
                return false;
            }
            true
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LlmConfig, LlmProvider};

    struct StaticProvider(String);

    #[async_trait::async_trait]
    impl LlmProvider for StaticProvider {
        async fn chat(
            &self,
            _messages: Vec<ChatMessage>,
            _model: Option<String>,
        ) -> anyhow::Result<String> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "Static"
        }
    }

    fn extractor_with_response(response: &str) -> FragmentExtractor {
        let manager = Arc::new(LlmProviderManager::new(&LlmConfig::default()));
        manager.register("static", Arc::new(StaticProvider(response.to_string())));
        FragmentExtractor::new(
            manager,
            ExtractorConfig {
                provider_id: "static".to_string(),
                ..ExtractorConfig::default()
            },
        )
    }

    #[test]
    fn parses_array_wrapped_in_prose() {
        let response = r#"
        Here are the extracted fragments:
        [
            {"entityType": "state", "entityName": "Florida", "content": "S1"},
            {"entityType": "form", "entityName": "03", "content": "F3"}
        ]
        "#;

        let fragments = parse_fragments(response).unwrap();
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0], Fragment::new("state", "Florida", "S1"));
    }

    #[test]
    fn drops_unknown_entity_types() {
        let response = r#"[
            {"entityType": "vehicle", "entityName": "Truck", "content": "V1"},
            {"entityType": "form", "entityName": "03", "content": "F3"}
        ]"#;

        let fragments = parse_fragments(response).unwrap();
        assert_eq!(fragments, vec![Fragment::new("form", "03", "F3")]);
    }

    #[test]
    fn no_array_means_no_fragments() {
        assert!(parse_fragments("I could not find any rules.").unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_fragments("[{\"entityType\": }]").is_err());
    }

    #[tokio::test]
    async fn extract_returns_fragments_from_provider() {
        let extractor = extractor_with_response(
            r#"[{"entityType": "form", "entityName": "03", "content": "Rule A applies."}]"#,
        );

        let fragments = extractor.extract("doc").await;
        assert_eq!(
            fragments,
            vec![Fragment::new("form", "03", "Rule A applies.")]
        );
    }

    #[tokio::test]
    async fn extraction_failure_yields_empty_list() {
        let manager = Arc::new(LlmProviderManager::new(&LlmConfig::default()));
        let extractor = FragmentExtractor::new(
            manager,
            ExtractorConfig {
                provider_id: "missing".to_string(),
                ..ExtractorConfig::default()
            },
        );

        assert!(extractor.extract("doc").await.is_empty());
    }

    #[tokio::test]
    async fn respects_max_fragments() {
        let response = r#"[
            {"entityType": "form", "entityName": "01", "content": "a"},
            {"entityType": "form", "entityName": "02", "content": "b"},
            {"entityType": "form", "entityName": "03", "content": "c"}
        ]"#;
        let manager = Arc::new(LlmProviderManager::new(&LlmConfig::default()));
        manager.register("static", Arc::new(StaticProvider(response.to_string())));
        let extractor = FragmentExtractor::new(
            manager,
            ExtractorConfig {
                provider_id: "static".to_string(),
                max_fragments: 2,
                ..ExtractorConfig::default()
            },
        );

        assert_eq!(extractor.extract("doc").await.len(), 2);
    }
}
