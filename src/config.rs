// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! All upstream API credentials are required at startup; there is no
//! runtime rotation.

use std::env;

/// Default Gemini model used for itinerary generation.
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key for itinerary generation
    pub gemini_api_key: String,
    /// Gemini model name
    pub gemini_model: String,
    /// Google Maps API key for geocoding
    pub maps_api_key: String,
    /// Lodging provider OAuth client ID
    pub lodging_client_id: String,
    /// Lodging provider OAuth client secret
    pub lodging_client_secret: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            gemini_api_key: env::var("GEMINI_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GEMINI_API_KEY"))?,
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            maps_api_key: env::var("MAPS_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("MAPS_API_KEY"))?,
            lodging_client_id: env::var("LODGING_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("LODGING_CLIENT_ID"))?,
            lodging_client_secret: env::var("LODGING_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("LODGING_CLIENT_SECRET"))?,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            gemini_api_key: "test_gemini_key".to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            maps_api_key: "test_maps_key".to_string(),
            lodging_client_id: "test_client_id".to_string(),
            lodging_client_secret: "test_client_secret".to_string(),
            gcp_project_id: "test-project".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("GEMINI_API_KEY", "test_gemini");
        env::set_var("MAPS_API_KEY", "test_maps");
        env::set_var("LODGING_CLIENT_ID", "test_id");
        env::set_var("LODGING_CLIENT_SECRET", "test_secret");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.gemini_api_key, "test_gemini");
        assert_eq!(config.lodging_client_id, "test_id");
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.port, 8080);
    }
}
