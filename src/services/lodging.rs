// SPDX-License-Identifier: MIT

//! Lodging provider client.
//!
//! Handles:
//! - Client-credentials token exchange (one token per pipeline run)
//! - Hotels-by-geocode search with bearer auth
//!
//! Tokens are short-lived and deliberately not cached across pipeline
//! runs; re-acquisition cost is accepted in exchange for not sharing
//! mutable token state between concurrent requests.

use crate::error::AppError;
use crate::models::Coordinates;
use serde::Deserialize;
use serde_json::Value;

const DEFAULT_BASE_URL: &str = "https://api.amadeus.com";

/// Lodging search API client.
#[derive(Clone)]
pub struct LodgingClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

/// Token exchange response from the authorization endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Hotel search response: a list of opaque candidate records.
#[derive(Debug, Deserialize)]
struct HotelSearchResponse {
    #[serde(default)]
    data: Vec<Value>,
}

impl LodgingClient {
    /// Create a new lodging client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id,
            client_secret,
        }
    }

    /// Override the API base URL (for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Exchange client credentials for a short-lived bearer token.
    pub async fn fetch_access_token(&self) -> Result<String, AppError> {
        let url = format!("{}/v1/security/oauth2/token", self.base_url);

        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Token exchange request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Lodging token exchange failed");
            return Err(AppError::Upstream(format!(
                "Token exchange failed with status {}",
                status
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse token response: {}", e)))?;

        Ok(token.access_token)
    }

    /// Search for lodging near the given coordinates.
    ///
    /// Returns the first candidate record, or `None` when the provider
    /// has nothing near the location.
    pub async fn search_nearby(
        &self,
        access_token: &str,
        coordinates: Coordinates,
    ) -> Result<Option<Value>, AppError> {
        let url = format!(
            "{}/v1/reference-data/locations/hotels/by-geocode",
            self.base_url
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("latitude", coordinates.lat.to_string()),
                ("longitude", coordinates.lng.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Hotel search request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "Hotel search HTTP {}: {}",
                status, body
            )));
        }

        let payload: HotelSearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Hotel search JSON parse error: {}", e)))?;

        Ok(payload.data.into_iter().next())
    }
}
