// SPDX-License-Identifier: MIT

//! Itinerary generation endpoint.

use crate::error::{AppError, Result};
use crate::models::Itinerary;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/generate", post(generate_itinerary))
}

/// Generation request body.
///
/// All fields arrive optional so validation can answer with the right
/// status: missing trip fields are a 400, a missing subject is a 401.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub country: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Subject identifier of the caller
    pub sub: Option<String>,
}

/// Validated generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub subject_id: String,
}

/// Validate the raw request body.
fn validate_request(body: GenerateRequest) -> Result<ValidatedRequest> {
    let subject_id = body
        .sub
        .filter(|s| !s.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let missing = || {
        AppError::BadRequest("Missing fields, could not generate an itinerary".to_string())
    };
    let destination = body.country.filter(|c| !c.is_empty()).ok_or_else(missing)?;
    let start_date = parse_date(body.start_date.as_deref().ok_or_else(missing)?)?;
    let end_date = parse_date(body.end_date.as_deref().ok_or_else(missing)?)?;

    if start_date > end_date {
        return Err(AppError::BadRequest(
            "startDate must not be after endDate".to_string(),
        ));
    }

    Ok(ValidatedRequest {
        destination,
        start_date,
        end_date,
        subject_id,
    })
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid date '{}': expected YYYY-MM-DD", raw)))
}

/// Generate and enrich an itinerary, then persist it to the caller's
/// history on a background task.
///
/// The history write is deliberately best-effort: the response carries
/// the enriched itinerary regardless of whether persistence succeeds,
/// and a failed write is only logged.
async fn generate_itinerary(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<Itinerary>> {
    let request = validate_request(body)?;

    let itinerary = state
        .pipeline
        .generate(&request.destination, request.start_date, request.end_date)
        .await?;

    // Persist after the response: spawn the write so the caller never
    // waits on (or sees an error from) the history store.
    let db = state.db.clone();
    let subject_id = request.subject_id.clone();
    let to_store = itinerary.clone();
    tokio::spawn(async move {
        if let Err(e) = db.append_generation(&subject_id, &to_store).await {
            tracing::warn!(subject_id = %subject_id, error = %e, "Failed to persist generation history");
        }
    });

    Ok(Json(itinerary))
}
