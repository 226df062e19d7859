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

//! Cypher Rendering
//!
//! Turns the structured store queries into Cypher statements for Neo4j.
//!
//! Two rules hold for every statement produced here:
//! - node labels are spliced from [`EntityKind::label`] and from nowhere
//!   else;
//! - names and content are always bound as parameters (`$name`, `$names_1`),
//!   never interpolated into the statement text.

use super::{GraphWrite, NameFilter, RetrievalQuery};
use serde_json::{Map, Value};

/// A Cypher statement plus its bound parameters, ready for the transactional
/// endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CypherStatement {
    pub statement: String,
    pub parameters: Map<String, Value>,
}

/// `MERGE` the node by `(label, name)` and set its rule content.
pub fn upsert_statement(write: &GraphWrite) -> CypherStatement {
    let statement = format!(
        "MERGE (n:{} {{name: $name}}) SET n.ruleContent = $content",
        write.kind.label()
    );

    let mut parameters = Map::new();
    parameters.insert("name".to_string(), Value::String(write.name.clone()));
    parameters.insert("content".to_string(), Value::String(write.content.clone()));

    CypherStatement {
        statement,
        parameters,
    }
}

/// Render the clause union as one `UNION ALL` read projecting `content`.
///
/// Each clause gets its own parameter (`$name_0`, `$names_1`, ...) so that
/// list and scalar criteria of the same kind never collide.
pub fn retrieval_statement(query: &RetrievalQuery) -> CypherStatement {
    let mut parts = Vec::with_capacity(query.clauses.len());
    let mut parameters = Map::new();

    for (i, clause) in query.clauses.iter().enumerate() {
        let label = clause.kind.label();
        match &clause.filter {
            NameFilter::Equals(name) => {
                let param = format!("name_{i}");
                parts.push(format!(
                    "MATCH (n:{label} {{name: ${param}}}) RETURN n.ruleContent AS content"
                ));
                parameters.insert(param, Value::String(name.clone()));
            }
            NameFilter::In(names) => {
                let param = format!("names_{i}");
                parts.push(format!(
                    "MATCH (n:{label}) WHERE n.name IN ${param} RETURN n.ruleContent AS content"
                ));
                parameters.insert(
                    param,
                    Value::Array(names.iter().cloned().map(Value::String).collect()),
                );
            }
        }
    }

    CypherStatement {
        statement: parts.join(" UNION ALL "),
        parameters,
    }
}
