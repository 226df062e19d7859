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

//! Entity-Store Boundary
//!
//! The minimal contract the rest of the crate needs from a graph database:
//! upsert a node's rule content by `(label, name)`, and run a union of
//! per-label retrieval clauses projecting that content, nulls preserved.
//!
//! Queries cross this boundary as structured values, not query text. Labels
//! travel as [`EntityKind`], so by the time a query reaches a store
//! implementation the structural identifiers are already drawn from a closed
//! set; implementations only ever bind names and content as parameters.

use crate::error::GraphError;
use ruleweave_core::EntityKind;

pub mod cypher;
pub mod memory;
pub mod neo4j;

pub use memory::MemoryGraphStore;
pub use neo4j::{Neo4jConfig, Neo4jStore};

/// An idempotent create-or-update of one entity node's rule content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphWrite {
    pub kind: EntityKind,
    pub name: String,
    pub content: String,
}

/// The name filter of a retrieval clause: equality for scalar criteria,
/// membership for list criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameFilter {
    Equals(String),
    In(Vec<String>),
}

impl NameFilter {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NameFilter::Equals(value) => value == name,
            NameFilter::In(values) => values.iter().any(|v| v == name),
        }
    }
}

/// One per-criterion clause: all nodes of `kind` whose name passes `filter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalClause {
    pub kind: EntityKind,
    pub filter: NameFilter,
}

/// An ordered union of retrieval clauses, executed as a single read.
///
/// Union semantics preserve duplicates: every matched node contributes its
/// content independently, clauses in order, rows within a clause in
/// store-determined order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievalQuery {
    pub clauses: Vec<RetrievalClause>,
}

impl RetrievalQuery {
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// The read/write contract against the entity store.
#[async_trait::async_trait]
pub trait GraphStore: Send + Sync {
    /// Create the node if absent, then set its rule content (last-write-wins).
    async fn upsert(&self, write: &GraphWrite) -> Result<(), GraphError>;

    /// Execute the clause union and project each matched node's rule content.
    /// Nodes without content yield `None`; callers decide what to filter.
    async fn retrieve(&self, query: &RetrievalQuery) -> Result<Vec<Option<String>>, GraphError>;
}
