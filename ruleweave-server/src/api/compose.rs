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

use axum::{extract::State, Json};
use ruleweave_core::CriteriaPayload;
use serde::Serialize;
use tracing::debug;

use crate::api::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct ComposeResponse {
    /// All matched fragment contents joined with single spaces.
    pub composed_rule: String,
    /// The individual fragments, in aggregation order.
    pub fragments_found: Vec<String>,
}

/// POST /api/v1/rules/compose
///
/// Finds all rule fragments matching the payload criteria and aggregates
/// them into one rule text.
///
/// - **Receives**: a JSON object; values are strings or lists of strings.
/// - **Returns**: the combined rule plus the supporting fragments, 404 when
///   nothing matches, 503 while the entity store is unavailable.
pub async fn compose_rule(
    State(state): State<AppState>,
    Json(payload): Json<CriteriaPayload>,
) -> Result<Json<ComposeResponse>, ApiError> {
    let querier = state.querier.as_ref().ok_or_else(|| {
        ApiError::ServiceUnavailable("entity store connection is not configured".to_string())
    })?;

    debug!(criteria = payload.len(), "composing rule");

    let fragments = querier.aggregated_rules(&payload).await?;

    if fragments.is_empty() {
        return Err(ApiError::NotFound(
            "no rule fragments found for the given criteria".to_string(),
        ));
    }

    Ok(Json(ComposeResponse {
        composed_rule: fragments.join(" "),
        fragments_found: fragments,
    }))
}
