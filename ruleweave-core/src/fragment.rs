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

//! Rule Fragments
//!
//! A fragment is the transient triple the extractor produces for each piece
//! of a rule document. Fields are kept as raw strings: extraction output is
//! untrusted, and validation (including the entity-kind allow-list) happens
//! in the populator.

use serde::{Deserialize, Serialize};

/// One extracted rule fragment, tied to a single entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    /// The type of the entity (e.g., "state", "form").
    pub entity_type: String,
    /// The name of the entity (e.g., "Florida", "03").
    pub entity_name: String,
    /// The rule content that applies to this entity.
    pub content: String,
}

impl Fragment {
    pub fn new(
        entity_type: impl Into<String>,
        entity_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_name: entity_name.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_wire_format() {
        let fragment: Fragment = serde_json::from_str(
            r#"{"entityType": "form", "entityName": "03", "content": "Rule A applies."}"#,
        )
        .unwrap();
        assert_eq!(fragment, Fragment::new("form", "03", "Rule A applies."));
    }
}
