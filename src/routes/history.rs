// SPDX-License-Identifier: MIT

//! Generation history endpoint.

use crate::error::{AppError, Result};
use crate::models::Itinerary;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/history", get(get_history))
}

#[derive(Deserialize)]
struct HistoryQuery {
    /// Subject identifier of the caller
    sub: Option<String>,
}

/// History response: previous generations in insertion order.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub previous_generations: Vec<Itinerary>,
}

/// Get the caller's previous generations.
async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>> {
    let subject_id = params
        .sub
        .filter(|s| !s.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let history = state
        .db
        .get_history(&subject_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No history for subject {}", subject_id)))?;

    Ok(Json(HistoryResponse {
        previous_generations: history.previous_generations,
    }))
}
