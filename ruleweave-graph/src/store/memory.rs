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

//! In-process entity store with the same contract as the Neo4j client.
//! Used by tests and by anything that needs store semantics without a
//! running database. Nodes keep insertion order, which stands in for the
//! store-determined row order of a real database.

use super::{GraphStore, GraphWrite, RetrievalQuery};
use crate::error::GraphError;
use parking_lot::RwLock;
use ruleweave_core::EntityKind;

#[derive(Debug)]
struct MemoryNode {
    kind: EntityKind,
    name: String,
    content: Option<String>,
}

/// A [`GraphStore`] over a `Vec` behind a `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryGraphStore {
    nodes: RwLock<Vec<MemoryNode>>,
}

impl MemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a node directly, including nodes that exist without rule content.
    pub fn seed(&self, kind: EntityKind, name: impl Into<String>, content: Option<String>) {
        let name = name.into();
        let mut nodes = self.nodes.write();
        match nodes.iter_mut().find(|n| n.kind == kind && n.name == name) {
            Some(node) => node.content = content,
            None => nodes.push(MemoryNode {
                kind,
                name,
                content,
            }),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.read().len()
    }

    /// The stored content of `(kind, name)`, if the node exists.
    pub fn content_of(&self, kind: EntityKind, name: &str) -> Option<Option<String>> {
        self.nodes
            .read()
            .iter()
            .find(|n| n.kind == kind && n.name == name)
            .map(|n| n.content.clone())
    }
}

#[async_trait::async_trait]
impl GraphStore for MemoryGraphStore {
    async fn upsert(&self, write: &GraphWrite) -> Result<(), GraphError> {
        self.seed(write.kind, write.name.clone(), Some(write.content.clone()));
        Ok(())
    }

    async fn retrieve(&self, query: &RetrievalQuery) -> Result<Vec<Option<String>>, GraphError> {
        let nodes = self.nodes.read();
        let mut rows = Vec::new();
        for clause in &query.clauses {
            for node in nodes.iter() {
                if node.kind == clause.kind && clause.filter.matches(&node.name) {
                    rows.push(node.content.clone());
                }
            }
        }
        Ok(rows)
    }
}
