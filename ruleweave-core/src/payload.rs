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

//! Criteria Payloads
//!
//! The request shape of the compose endpoint: a JSON object whose keys are
//! criterion names and whose values are a single string or a list of strings.
//!
//! Result ordering is contractually tied to the order keys appear in the
//! request body, so the payload is backed by an insertion-ordered `Vec`
//! rather than a sorted map, with a hand-written `Deserialize` that walks the
//! JSON object in document order.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single criterion value: scalar equality or list membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriterionValue {
    One(String),
    Many(Vec<String>),
}

impl CriterionValue {
    /// Empty values carry no filter and are skipped by the querier.
    pub fn is_empty(&self) -> bool {
        match self {
            CriterionValue::One(value) => value.is_empty(),
            CriterionValue::Many(values) => values.is_empty(),
        }
    }
}

impl From<&str> for CriterionValue {
    fn from(value: &str) -> Self {
        CriterionValue::One(value.to_string())
    }
}

impl From<Vec<&str>> for CriterionValue {
    fn from(values: Vec<&str>) -> Self {
        CriterionValue::Many(values.into_iter().map(String::from).collect())
    }
}

/// An ordered mapping of criterion key to value(s).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriteriaPayload {
    criteria: Vec<(String, CriterionValue)>,
}

impl CriteriaPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a criterion, replacing an earlier value for the same key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CriterionValue>) {
        let key = key.into();
        let value = value.into();
        match self.criteria.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.criteria.push((key, value)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CriterionValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Criteria in the order they appeared in the request body.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CriterionValue)> {
        self.criteria.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

impl Serialize for CriteriaPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.criteria.len()))?;
        for (key, value) in &self.criteria {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CriteriaPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PayloadVisitor;

        impl<'de> Visitor<'de> for PayloadVisitor {
            type Value = CriteriaPayload;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of criterion keys to strings or string lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut payload = CriteriaPayload::new();
                while let Some((key, value)) = access.next_entry::<String, CriterionValue>()? {
                    payload.insert(key, value);
                }
                Ok(payload)
            }
        }

        deserializer.deserialize_map(PayloadVisitor)
    }
}
