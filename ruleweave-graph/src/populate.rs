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

//! Graph Populator
//!
//! Folds extracted fragments onto entity nodes. Ingestion is best-effort per
//! fragment: an invalid fragment is skipped and recorded, a store failure
//! aborts the call. Each fragment is one independent upsert; there is no
//! cross-fragment transaction, so writes applied before a failure stay
//! applied.

use crate::error::GraphError;
use crate::store::{GraphStore, GraphWrite};
use ruleweave_core::{EntityKind, Fragment};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Why a fragment was not written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingEntityType,
    MissingEntityName,
    MissingContent,
    UnknownEntityType(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingEntityType => f.write_str("missing entity type"),
            SkipReason::MissingEntityName => f.write_str("missing entity name"),
            SkipReason::MissingContent => f.write_str("missing content"),
            SkipReason::UnknownEntityType(kind) => write!(f, "unknown entity type: {kind}"),
        }
    }
}

/// Per-fragment ingestion outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentOutcome {
    Stored { kind: EntityKind, name: String },
    Skipped { reason: SkipReason },
}

/// What happened to each fragment of a populate call.
#[derive(Debug, Default)]
pub struct PopulateReport {
    pub outcomes: Vec<FragmentOutcome>,
}

impl PopulateReport {
    pub fn stored(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FragmentOutcome::Stored { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.stored()
    }
}

/// Writes extracted fragments into the entity store.
pub struct GraphPopulator {
    store: Arc<dyn GraphStore>,
}

impl GraphPopulator {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Upsert one node per valid fragment (last-write-wins on content) and
    /// report what happened to each fragment.
    pub async fn populate(&self, fragments: &[Fragment]) -> Result<PopulateReport, GraphError> {
        let mut report = PopulateReport::default();

        for fragment in fragments {
            match validate(fragment) {
                Ok(kind) => {
                    self.store
                        .upsert(&GraphWrite {
                            kind,
                            name: fragment.entity_name.clone(),
                            content: fragment.content.clone(),
                        })
                        .await?;
                    debug!(label = kind.label(), name = %fragment.entity_name, "stored rule fragment");
                    report.outcomes.push(FragmentOutcome::Stored {
                        kind,
                        name: fragment.entity_name.clone(),
                    });
                }
                Err(reason) => {
                    warn!(%reason, "skipping invalid fragment");
                    report.outcomes.push(FragmentOutcome::Skipped { reason });
                }
            }
        }

        Ok(report)
    }
}

fn validate(fragment: &Fragment) -> Result<EntityKind, SkipReason> {
    if fragment.entity_type.is_empty() {
        return Err(SkipReason::MissingEntityType);
    }
    if fragment.entity_name.is_empty() {
        return Err(SkipReason::MissingEntityName);
    }
    if fragment.content.is_empty() {
        return Err(SkipReason::MissingContent);
    }

    fragment
        .entity_type
        .parse::<EntityKind>()
        .map_err(|e| SkipReason::UnknownEntityType(e.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryGraphStore;

    fn populator() -> (Arc<MemoryGraphStore>, GraphPopulator) {
        let store = Arc::new(MemoryGraphStore::new());
        let populator = GraphPopulator::new(store.clone());
        (store, populator)
    }

    #[tokio::test]
    async fn writes_valid_fragments() {
        let (store, populator) = populator();
        let report = populator
            .populate(&[
                Fragment::new("state", "Florida", "S1"),
                Fragment::new("form", "03", "F3"),
            ])
            .await
            .unwrap();

        assert_eq!(report.stored(), 2);
        assert_eq!(report.skipped(), 0);
        assert_eq!(
            store.content_of(EntityKind::State, "Florida"),
            Some(Some("S1".into()))
        );
    }

    #[tokio::test]
    async fn fragment_missing_name_never_touches_the_store() {
        let (store, populator) = populator();
        let report = populator
            .populate(&[Fragment::new("state", "", "orphan content")])
            .await
            .unwrap();

        assert_eq!(store.node_count(), 0);
        assert_eq!(
            report.outcomes,
            vec![FragmentOutcome::Skipped {
                reason: SkipReason::MissingEntityName
            }]
        );
    }

    #[tokio::test]
    async fn unknown_entity_type_is_rejected() {
        let (store, populator) = populator();
        let report = populator
            .populate(&[Fragment::new("Rule) DETACH DELETE n", "x", "y")])
            .await
            .unwrap();

        assert_eq!(store.node_count(), 0);
        assert_eq!(report.skipped(), 1);
        assert!(matches!(
            &report.outcomes[0],
            FragmentOutcome::Skipped {
                reason: SkipReason::UnknownEntityType(_)
            }
        ));
    }

    #[tokio::test]
    async fn repopulating_overwrites_rather_than_duplicating() {
        let (store, populator) = populator();
        populator
            .populate(&[Fragment::new("form", "03", "first version")])
            .await
            .unwrap();
        populator
            .populate(&[Fragment::new("form", "03", "second version")])
            .await
            .unwrap();

        assert_eq!(store.node_count(), 1);
        assert_eq!(
            store.content_of(EntityKind::Form, "03"),
            Some(Some("second version".into()))
        );
    }

    #[tokio::test]
    async fn invalid_fragment_does_not_abort_the_batch() {
        let (store, populator) = populator();
        let report = populator
            .populate(&[
                Fragment::new("form", "03", ""),
                Fragment::new("account", "Gold", "A1"),
            ])
            .await
            .unwrap();

        assert_eq!(report.stored(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(
            store.content_of(EntityKind::Account, "Gold"),
            Some(Some("A1".into()))
        );
    }
}
