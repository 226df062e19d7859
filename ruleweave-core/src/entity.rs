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

//! Entity Kinds
//!
//! The closed enumeration of entity types a rule fragment can attach to.
//! Node labels are derived from this enum and from nothing else: user- or
//! model-supplied strings must pass through [`EntityKind::from_str`] before
//! they can ever appear in a graph query, which keeps structural identifiers
//! out of reach of injection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A criterion key or fragment type that is not part of the accepted
/// enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity kind: {0}")]
pub struct UnknownEntityKind(pub String);

/// Entity types recognized by the knowledge graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    /// A US state (e.g., "Florida")
    State,
    /// A property type (e.g., "Residential")
    Property,
    /// A form identifier (e.g., "03")
    Form,
    /// An account or account group
    Account,
    /// A program type (e.g., "Renewal")
    ProgramType,
    /// An application type
    ApplicationType,
}

impl EntityKind {
    /// Every accepted kind, in a stable order.
    pub const ALL: [EntityKind; 6] = [
        EntityKind::State,
        EntityKind::Property,
        EntityKind::Form,
        EntityKind::Account,
        EntityKind::ProgramType,
        EntityKind::ApplicationType,
    ];

    /// The criterion key / wire spelling for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::State => "state",
            EntityKind::Property => "property",
            EntityKind::Form => "form",
            EntityKind::Account => "account",
            EntityKind::ProgramType => "programType",
            EntityKind::ApplicationType => "applicationType",
        }
    }

    /// The node label used in the entity store.
    ///
    /// Labels are static strings drawn from this closed set, never built from
    /// request input.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::State => "State",
            EntityKind::Property => "Property",
            EntityKind::Form => "Form",
            EntityKind::Account => "Account",
            EntityKind::ProgramType => "ProgramType",
            EntityKind::ApplicationType => "ApplicationType",
        }
    }
}

impl FromStr for EntityKind {
    type Err = UnknownEntityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "state" => Ok(EntityKind::State),
            "property" => Ok(EntityKind::Property),
            "form" => Ok(EntityKind::Form),
            "account" => Ok(EntityKind::Account),
            "programtype" => Ok(EntityKind::ProgramType),
            "applicationtype" => Ok(EntityKind::ApplicationType),
            _ => Err(UnknownEntityKind(s.to_string())),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_accepted_kinds() {
        assert_eq!("state".parse::<EntityKind>().unwrap(), EntityKind::State);
        assert_eq!("Form".parse::<EntityKind>().unwrap(), EntityKind::Form);
        assert_eq!(
            "programType".parse::<EntityKind>().unwrap(),
            EntityKind::ProgramType
        );
    }

    #[test]
    fn rejects_unknown_kinds() {
        let err = "Rule) DETACH DELETE n //".parse::<EntityKind>().unwrap_err();
        assert_eq!(err.0, "Rule) DETACH DELETE n //");
    }

    #[test]
    fn labels_are_capitalized() {
        assert_eq!(EntityKind::State.label(), "State");
        assert_eq!(EntityKind::ProgramType.label(), "ProgramType");
    }

    #[test]
    fn serde_uses_camel_case() {
        let json = serde_json::to_string(&EntityKind::ApplicationType).unwrap();
        assert_eq!(json, "\"applicationType\"");
    }
}
