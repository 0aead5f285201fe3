// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod enrich;
pub mod gemini;
pub mod geocode;
pub mod lodging;
pub mod pipeline;

pub use gemini::GeminiClient;
pub use geocode::GeocodeClient;
pub use lodging::LodgingClient;
pub use pipeline::ItineraryPipeline;
