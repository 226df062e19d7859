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

//! Ruleweave Core
//!
//! Domain types shared by the ingestion and query paths: the closed entity
//! enumeration, extracted rule fragments, and criteria payloads.

pub mod entity;
pub mod fragment;
pub mod payload;

pub use entity::{EntityKind, UnknownEntityKind};
pub use fragment::Fragment;
pub use payload::{CriteriaPayload, CriterionValue};
