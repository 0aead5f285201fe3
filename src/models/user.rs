// SPDX-License-Identifier: MIT

//! User generation history for storage and API.

use crate::models::Itinerary;
use serde::{Deserialize, Serialize};

/// A user's generation history stored in Firestore.
///
/// One document per subject, keyed by the subject identifier. Created on
/// the first successful generation, appended to afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserHistory {
    /// Stable subject identifier (also used as document ID)
    pub subject_id: String,
    /// Enriched itineraries, in insertion order
    pub previous_generations: Vec<Itinerary>,
    /// When the record was created
    pub created_at: String,
    /// When the last generation was appended
    pub updated_at: String,
}
