// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod itinerary;
pub mod user;

pub use itinerary::{Coordinates, DayPlan, HotelResult, Itinerary, PlaceCoordinate, Transportation};
pub use user::UserHistory;
