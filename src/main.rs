// SPDX-License-Identifier: MIT

//! Voyageur API Server
//!
//! Generates multi-day travel itineraries with Gemini and enriches them
//! with geocoded coordinates and lodging suggestions.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voyageur::{
    config::Config,
    db::FirestoreDb,
    services::{GeminiClient, GeocodeClient, ItineraryPipeline, LodgingClient},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Voyageur API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Construct upstream service clients
    let gemini = GeminiClient::new(config.gemini_api_key.clone(), config.gemini_model.clone());
    let geocode = GeocodeClient::new(config.maps_api_key.clone());
    let lodging = LodgingClient::new(
        config.lodging_client_id.clone(),
        config.lodging_client_secret.clone(),
    );

    let pipeline = ItineraryPipeline::new(gemini, geocode, lodging);
    tracing::info!(model = %config.gemini_model, "Itinerary pipeline initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        pipeline,
    });

    // Build router
    let app = voyageur::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("voyageur=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
