// SPDX-License-Identifier: MIT

//! Voyageur: generate and enrich multi-day travel itineraries.
//!
//! This crate provides the backend API that asks Gemini for a
//! schema-constrained itinerary, geocodes every city and attraction,
//! attaches nearby lodging, and persists the result per user.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::ItineraryPipeline;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub pipeline: ItineraryPipeline,
}
