// SPDX-License-Identifier: MIT

//! Itinerary model: the draft produced by the generation service plus the
//! derived enrichment fields attached by the geocoding and lodging stages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Transportation mode to reach a day's city from the previous day's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transportation {
    Flight,
    Train,
    Bus,
}

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// True if both components are finite and within valid ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// A resolved attraction coordinate, paired with the place name it
/// resolved. Geocoding failures omit the entry entirely, so this list
/// must never be index-matched against `DayPlan::locations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceCoordinate {
    pub name: String,
    pub coordinates: Coordinates,
}

/// Outcome of the lodging lookup for a day.
///
/// `NotFound` is an explicit marker: a day that was attempted but yielded
/// no lodging carries it, while a day that was never attempted (the final
/// day of the trip) has no hotel field at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HotelResult {
    Found { hotel: Value },
    NotFound,
}

impl HotelResult {
    pub fn is_found(&self) -> bool {
        matches!(self, HotelResult::Found { .. })
    }
}

/// One day of the itinerary.
///
/// The first six fields come from the generation service; the remaining
/// three are derived by enrichment and default to empty when parsing the
/// draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// Calendar date (YYYY-MM-DD), within the requested range.
    pub date: NaiveDate,
    /// City used as the geocoding query for the day's base location.
    pub city: String,
    /// Short human-readable activity descriptions.
    pub activities: Vec<String>,
    /// Attraction names, parallel to `activities`.
    pub locations: Vec<String>,
    pub transportation: Transportation,
    /// Free-text daily summary.
    pub overview: String,

    /// Geocoded city location; `None` when the lookup failed.
    #[serde(default)]
    pub city_coordinates: Option<Coordinates>,
    /// Geocoded attractions (failures omitted, see [`PlaceCoordinate`]).
    #[serde(default)]
    pub location_coordinates: Vec<PlaceCoordinate>,
    /// Lodging for the night; absent on the final day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel: Option<HotelResult>,
}

/// A full generated itinerary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    pub country: String,
    pub itinerary: Vec<DayPlan>,
}
