// SPDX-License-Identifier: MIT

use std::sync::Arc;
use voyageur::config::Config;
use voyageur::db::FirestoreDb;
use voyageur::routes::create_router;
use voyageur::services::{GeminiClient, GeocodeClient, ItineraryPipeline, LodgingClient};
use voyageur::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Base URLs for the three outbound services.
#[allow(dead_code)]
pub struct UpstreamBases {
    pub gemini: String,
    pub geocode: String,
    pub lodging: String,
}

impl Default for UpstreamBases {
    /// Unroutable addresses so stray upstream calls fail fast.
    fn default() -> Self {
        Self {
            gemini: "http://127.0.0.1:9".to_string(),
            geocode: "http://127.0.0.1:9".to_string(),
            lodging: "http://127.0.0.1:9".to_string(),
        }
    }
}

/// Build a pipeline whose clients point at the given base URLs.
#[allow(dead_code)]
pub fn test_pipeline(config: &Config, bases: &UpstreamBases) -> ItineraryPipeline {
    let gemini = GeminiClient::new(config.gemini_api_key.clone(), config.gemini_model.clone())
        .with_base_url(bases.gemini.clone());
    let geocode =
        GeocodeClient::new(config.maps_api_key.clone()).with_base_url(bases.geocode.clone());
    let lodging = LodgingClient::new(
        config.lodging_client_id.clone(),
        config.lodging_client_secret.clone(),
    )
    .with_base_url(bases.lodging.clone());

    ItineraryPipeline::new(gemini, geocode, lodging)
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_bases(&UpstreamBases::default())
}

/// Create a test app whose upstream clients point at the given bases.
#[allow(dead_code)]
pub fn create_test_app_with_bases(bases: &UpstreamBases) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();
    let pipeline = test_pipeline(&config, bases);

    let state = Arc::new(AppState {
        config,
        db,
        pipeline,
    });

    (create_router(state.clone()), state)
}
