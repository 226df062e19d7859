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

//! Ruleweave Graph
//!
//! The knowledge-graph half of Ruleweave: the entity-store boundary, the
//! populator that folds extracted fragments onto entity nodes, and the
//! querier that composes a retrieval query per criterion and aggregates the
//! matched rule content.
//!
//! ## Architecture
//!
//! ```text
//! Fragments → GraphPopulator → GraphStore (Neo4j / in-memory)
//!                                   ↑
//! CriteriaPayload → GraphQuerier ───┘→ composed rule content
//! ```
//!
//! The store boundary speaks in structured queries ([`store::GraphWrite`],
//! [`store::RetrievalQuery`]) whose labels come from the closed
//! [`ruleweave_core::EntityKind`] enumeration; only the Neo4j implementation
//! turns them into Cypher text, with every value bound as a parameter.

pub mod error;
pub mod populate;
pub mod query;
pub mod store;

pub use error::GraphError;
pub use populate::{FragmentOutcome, GraphPopulator, PopulateReport, SkipReason};
pub use query::GraphQuerier;
pub use store::{GraphStore, GraphWrite, NameFilter, RetrievalClause, RetrievalQuery};
