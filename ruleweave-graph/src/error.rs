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

/// Errors surfaced by the entity-store boundary and the query path.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The store could not be reached or the request failed in transit.
    #[error("graph store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store executed the request and reported an error.
    #[error("graph store error ({code}): {message}")]
    Store { code: String, message: String },

    /// The store answered with a body this client does not understand.
    #[error("malformed graph store response: {0}")]
    InvalidResponse(String),

    /// A criterion key outside the accepted entity enumeration. Rejected
    /// rather than spliced into a query.
    #[error("unknown criterion key: {0}")]
    UnknownCriterion(String),
}

impl GraphError {
    /// Whether the error is a bad request rather than a store-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, GraphError::UnknownCriterion(_))
    }
}
