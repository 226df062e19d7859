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

//! Graph Querier / Aggregator
//!
//! Criteria are heterogeneous in arity (scalar vs list) and in entity type
//! (each key becomes a distinct node label), so no static query fits every
//! payload. The querier synthesizes one retrieval clause per usable
//! criterion at request time, executes the union as a single read, and
//! aggregates the content rows:
//!
//! 1. payload pairs are walked in insertion order; empty values are skipped,
//!    keys outside the entity enumeration are rejected;
//! 2. scalar values become equality clauses, lists become membership clauses
//!    with the whole list bound as one parameter;
//! 3. zero usable clauses short-circuits to an empty result with no store
//!    call;
//! 4. null content is filtered out after the read, preserving row order.

use crate::error::GraphError;
use crate::store::{GraphStore, NameFilter, RetrievalClause, RetrievalQuery};
use ruleweave_core::{CriteriaPayload, CriterionValue, EntityKind};
use std::sync::Arc;
use tracing::debug;

/// Composes and runs aggregation reads against the entity store.
pub struct GraphQuerier {
    store: Arc<dyn GraphStore>,
}

impl GraphQuerier {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Translate a payload into a retrieval query, one clause per usable
    /// criterion, in payload order.
    pub fn compose_query(payload: &CriteriaPayload) -> Result<RetrievalQuery, GraphError> {
        let mut clauses = Vec::new();

        for (key, value) in payload.iter() {
            if value.is_empty() {
                continue;
            }

            let kind = key
                .parse::<EntityKind>()
                .map_err(|_| GraphError::UnknownCriterion(key.to_string()))?;

            let filter = match value {
                CriterionValue::One(name) => NameFilter::Equals(name.clone()),
                CriterionValue::Many(names) => NameFilter::In(names.clone()),
            };

            clauses.push(RetrievalClause { kind, filter });
        }

        Ok(RetrievalQuery { clauses })
    }

    /// All rule content matching the payload, in clause order, nulls removed.
    pub async fn aggregated_rules(
        &self,
        payload: &CriteriaPayload,
    ) -> Result<Vec<String>, GraphError> {
        let query = Self::compose_query(payload)?;
        if query.is_empty() {
            debug!("payload carried no usable criteria, skipping store read");
            return Ok(Vec::new());
        }

        let rows = self.store.retrieve(&query).await?;
        Ok(rows.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{GraphStore, GraphWrite, MemoryGraphStore};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts store reads so tests can assert on short-circuiting.
    struct RecordingStore {
        inner: MemoryGraphStore,
        retrievals: AtomicUsize,
    }

    impl RecordingStore {
        fn new(inner: MemoryGraphStore) -> Self {
            Self {
                inner,
                retrievals: AtomicUsize::new(0),
            }
        }

        fn retrievals(&self) -> usize {
            self.retrievals.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl GraphStore for RecordingStore {
        async fn upsert(&self, write: &GraphWrite) -> Result<(), GraphError> {
            self.inner.upsert(write).await
        }

        async fn retrieve(
            &self,
            query: &RetrievalQuery,
        ) -> Result<Vec<Option<String>>, GraphError> {
            self.retrievals.fetch_add(1, Ordering::SeqCst);
            self.inner.retrieve(query).await
        }
    }

    fn seeded_store() -> MemoryGraphStore {
        let store = MemoryGraphStore::new();
        store.seed(EntityKind::State, "Florida", Some("S1".into()));
        store.seed(EntityKind::Form, "03", Some("F3".into()));
        store.seed(EntityKind::Form, "04", None);
        store
    }

    #[test]
    fn one_clause_per_non_empty_key_in_payload_order() {
        let payload = CriteriaPayload::new()
            .with("state", "Florida")
            .with("property", "")
            .with("form", vec!["03", "04"]);

        let query = GraphQuerier::compose_query(&payload).unwrap();
        assert_eq!(query.clauses.len(), 2);
        assert_eq!(query.clauses[0].kind, EntityKind::State);
        assert_eq!(
            query.clauses[0].filter,
            NameFilter::Equals("Florida".into())
        );
        assert_eq!(query.clauses[1].kind, EntityKind::Form);
        assert_eq!(
            query.clauses[1].filter,
            NameFilter::In(vec!["03".into(), "04".into()])
        );
    }

    #[test]
    fn unknown_key_is_a_composition_error() {
        let payload = CriteriaPayload::new().with("vehicle", "Truck");
        let err = GraphQuerier::compose_query(&payload).unwrap_err();
        assert!(matches!(err, GraphError::UnknownCriterion(key) if key == "vehicle"));
    }

    #[tokio::test]
    async fn empty_payload_never_reaches_the_store() {
        let store = Arc::new(RecordingStore::new(seeded_store()));
        let querier = GraphQuerier::new(store.clone());

        let empty = CriteriaPayload::new();
        assert!(querier.aggregated_rules(&empty).await.unwrap().is_empty());

        let all_blank = CriteriaPayload::new()
            .with("state", "")
            .with("form", Vec::<&str>::new());
        assert!(querier
            .aggregated_rules(&all_blank)
            .await
            .unwrap()
            .is_empty());

        assert_eq!(store.retrievals(), 0);
    }

    #[tokio::test]
    async fn mixed_payload_orders_results_and_filters_nulls() {
        let querier = GraphQuerier::new(Arc::new(seeded_store()));

        let payload = CriteriaPayload::new()
            .with("state", "Florida")
            .with("form", vec!["03", "04"]);

        let rules = querier.aggregated_rules(&payload).await.unwrap();
        assert_eq!(rules, vec!["S1".to_string(), "F3".to_string()]);
    }

    #[tokio::test]
    async fn unmatched_values_contribute_nothing() {
        let querier = GraphQuerier::new(Arc::new(seeded_store()));

        let payload = CriteriaPayload::new().with("form", vec!["03", "99"]);
        let rules = querier.aggregated_rules(&payload).await.unwrap();
        assert_eq!(rules, vec!["F3".to_string()]);
    }

    #[tokio::test]
    async fn scalar_only_payload_matches_key_order() {
        let store = seeded_store();
        store.seed(EntityKind::Account, "Gold", Some("A1".into()));
        let querier = GraphQuerier::new(Arc::new(store));

        let payload = CriteriaPayload::new()
            .with("account", "Gold")
            .with("state", "Florida");

        let rules = querier.aggregated_rules(&payload).await.unwrap();
        assert_eq!(rules, vec!["A1".to_string(), "S1".to_string()]);
    }

    #[tokio::test]
    async fn populate_then_query_round_trip() {
        let store = Arc::new(MemoryGraphStore::new());
        let populator = crate::populate::GraphPopulator::new(store.clone());
        populator
            .populate(&[ruleweave_core::Fragment::new(
                "form",
                "03",
                "Rule A applies.",
            )])
            .await
            .unwrap();

        let querier = GraphQuerier::new(store);
        let payload = CriteriaPayload::new().with("form", "03");
        let rules = querier.aggregated_rules(&payload).await.unwrap();
        assert_eq!(rules, vec!["Rule A applies.".to_string()]);
    }
}
