// SPDX-License-Identifier: MIT

//! Google Geocoding API client.
//!
//! One request per place name; the first candidate match wins. Callers
//! are expected to treat each lookup failure as a local degradation, not
//! a pipeline failure.

use crate::error::AppError;
use crate::models::Coordinates;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

/// Geocoding API client.
#[derive(Clone)]
pub struct GeocodeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Top-level geocoding response.
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Coordinates,
}

impl GeocodeClient {
    /// Create a new geocoding client.
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        }
    }

    /// Override the API base URL (for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Resolve a free-text place name to coordinates.
    ///
    /// Uses the first returned match; no disambiguation among candidates.
    pub async fn geocode(&self, query: &str) -> Result<Coordinates, AppError> {
        let url = format!("{}/maps/api/geocode/json", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("address", query), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Geocode request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Geocode HTTP {}: {}",
                status, body
            )));
        }

        let payload: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Geocode JSON parse error: {}", e)))?;

        if payload.status != "OK" {
            return Err(AppError::Upstream(format!(
                "Geocode status {} for '{}'",
                payload.status, query
            )));
        }

        let coordinates = payload
            .results
            .into_iter()
            .next()
            .map(|r| r.geometry.location)
            .ok_or_else(|| AppError::Upstream(format!("No geocode results for '{}'", query)))?;

        // Never forward a lat/lng outside the valid range.
        if !coordinates.is_valid() {
            return Err(AppError::Upstream(format!(
                "Out-of-range coordinates for '{}': lat {}, lng {}",
                query, coordinates.lat, coordinates.lng
            )));
        }

        Ok(coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocode_response_parses_first_candidate() {
        let json = serde_json::json!({
            "status": "OK",
            "results": [
                { "geometry": { "location": { "lat": 35.6764, "lng": 139.6500 } } },
                { "geometry": { "location": { "lat": 0.0, "lng": 0.0 } } }
            ]
        });

        let parsed: GeocodeResponse = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.status, "OK");
        let first = &parsed.results[0].geometry.location;
        assert_eq!(first.lat, 35.6764);
        assert_eq!(first.lng, 139.65);
    }

    #[test]
    fn test_geocode_response_tolerates_missing_results() {
        let json = serde_json::json!({ "status": "ZERO_RESULTS" });
        let parsed: GeocodeResponse = serde_json::from_value(json).unwrap();
        assert!(parsed.results.is_empty());
    }

    #[tokio::test]
    async fn test_geocode_rejects_out_of_range_coordinates() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/maps/api/geocode/json")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "status": "OK",
                    "results": [
                        { "geometry": { "location": { "lat": 91.0, "lng": 0.0 } } }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client =
            GeocodeClient::new("test_maps_key".to_string()).with_base_url(server.url());
        let result = client.geocode("Nowhere").await;

        mock.assert_async().await;
        match result {
            Err(AppError::Upstream(msg)) => assert!(msg.contains("Out-of-range")),
            other => panic!("expected upstream error, got {:?}", other),
        }
    }
}
