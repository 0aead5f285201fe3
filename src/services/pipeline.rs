// SPDX-License-Identifier: MIT

//! Itinerary generation pipeline.
//!
//! Sequences the core workflow:
//! 1. Generate a draft itinerary from Gemini (schema-constrained)
//! 2. Geocode every day's city and attractions (concurrent fan-out)
//! 3. Attach lodging per day (token exchange + concurrent fan-out)
//!
//! Only generation can fail the pipeline. Once enrichment starts, every
//! failure degrades data locally and the caller still gets an itinerary.
//! Persistence happens after the response is sent and is owned by the
//! route layer.

use crate::error::Result;
use crate::models::Itinerary;
use crate::services::{enrich, GeminiClient, GeocodeClient, LodgingClient};
use chrono::NaiveDate;

/// Runs the generate-and-enrich pipeline over injected service clients.
#[derive(Clone)]
pub struct ItineraryPipeline {
    gemini: GeminiClient,
    geocode: GeocodeClient,
    lodging: LodgingClient,
}

impl ItineraryPipeline {
    pub fn new(gemini: GeminiClient, geocode: GeocodeClient, lodging: LodgingClient) -> Self {
        Self {
            gemini,
            geocode,
            lodging,
        }
    }

    /// Produce a fully enriched itinerary for a destination and date range.
    pub async fn generate(
        &self,
        destination: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Itinerary> {
        tracing::info!(destination, %start_date, %end_date, "Generating itinerary");

        // 1. Draft generation; a hard failure here aborts the request.
        let mut itinerary = self
            .gemini
            .generate_itinerary(destination, start_date, end_date)
            .await?;

        // 2. Coordinates, then 3. lodging (which needs the city coordinates).
        enrich::enrich_coordinates(&self.geocode, &mut itinerary).await;
        enrich::enrich_lodging(&self.lodging, &mut itinerary).await;

        let geocoded_days = itinerary
            .itinerary
            .iter()
            .filter(|d| d.city_coordinates.is_some())
            .count();
        let hotels_found = itinerary
            .itinerary
            .iter()
            .filter(|d| d.hotel.as_ref().is_some_and(|h| h.is_found()))
            .count();
        tracing::info!(
            destination,
            days = itinerary.itinerary.len(),
            geocoded_days,
            hotels_found,
            "Itinerary enriched"
        );

        Ok(itinerary)
    }
}
