// SPDX-License-Identifier: MIT

//! Gemini client for draft itinerary generation.
//!
//! One structured-output round trip per pipeline run: the request carries
//! the response schema and the destination/date-range user turn, and the
//! returned text is expected to parse as a complete [`Itinerary`]. Any
//! deviation is a hard failure; there is no partial recovery here.

use crate::error::AppError;
use crate::models::Itinerary;
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// System instruction steering the model toward the itinerary schema.
const SYSTEM_INSTRUCTION: &str = "Generate travel itineraries in the following JSON format. \
    The country/area the user wants to visit will be inputted, as well as a starting date and \
    ending date. The itinerary should start exactly on the starting date and end on the ending \
    date. Make sure to include the best attractions and activities from all across the area \
    (popular and not well known), organized by days at which an attraction is visited. Keep the \
    descriptions for the activities short and concise. Add the searchable location name of each \
    attraction, keeping only the most important words and leaving behind unnecessary information \
    which makes the location hard to find. Make sure to include city name of the attractions in \
    each day, and indicate the form of transportation that is needed to reach the location from \
    the previous day. Write a brief overview of the activities in the day, almost like a preview \
    of what is ahead.";

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model,
        }
    }

    /// Override the API base URL (for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Generate a draft itinerary for a destination and date range.
    ///
    /// Returns the parsed itinerary, or `AppError::Generation` if the
    /// upstream call errors or the returned text is not valid JSON.
    pub async fn generate_itinerary(
        &self,
        destination: &str,
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
    ) -> Result<Itinerary, AppError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );

        let body = json!({
            "systemInstruction": {
                "parts": [{ "text": SYSTEM_INSTRUCTION }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": format!("{}, {}, {}", destination, start_date, end_date) }]
            }],
            "generationConfig": generation_config(),
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Generation(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Generation(format!("HTTP {}: {}", status, body)));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AppError::Generation(format!("JSON parse error: {}", e)))?;

        let text = extract_text(&payload).ok_or_else(|| {
            AppError::Generation("Response contains no candidate text".to_string())
        })?;

        let itinerary: Itinerary = serde_json::from_str(text).map_err(|e| {
            AppError::Generation(format!("Generated text is not a valid itinerary: {}", e))
        })?;

        tracing::info!(
            destination,
            days = itinerary.itinerary.len(),
            "Draft itinerary generated"
        );

        Ok(itinerary)
    }
}

/// Pull the first candidate's text out of a generateContent response.
fn extract_text(payload: &Value) -> Option<&str> {
    payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}

/// Generation config with the structured-output response schema attached.
fn generation_config() -> Value {
    json!({
        "temperature": 1.0,
        "topP": 0.95,
        "topK": 64,
        "maxOutputTokens": 8192,
        "responseMimeType": "application/json",
        "responseSchema": response_schema(),
    })
}

/// The fixed shape a draft itinerary must satisfy.
fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "country": {
                "type": "STRING",
                "description": "Name of the country the itinerary applies to."
            },
            "itinerary": {
                "type": "ARRAY",
                "description": "An array of objects representing each day of the trip.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "date": {
                            "type": "STRING",
                            "description": "Date for the activities in the format YYYY-MM-DD, for example 2024-07-22."
                        },
                        "city": {
                            "type": "STRING",
                            "description": "Location for that day, city name."
                        },
                        "activities": {
                            "type": "ARRAY",
                            "description": "Array of strings listing suggested activities for that day.",
                            "items": { "type": "STRING" }
                        },
                        "locations": {
                            "type": "ARRAY",
                            "description": "Array of strings listing the names of the attractions visited in the activities array.",
                            "items": { "type": "STRING" }
                        },
                        "transportation": {
                            "type": "STRING",
                            "description": "The type of transportation that is needed to reach the destination. One word only, either flight, train, or bus.",
                            "enum": ["flight", "train", "bus"]
                        },
                        "overview": {
                            "type": "STRING",
                            "description": "A brief summary of the day, including activities, and any transportation"
                        }
                    },
                    "required": ["date", "city", "activities", "locations", "transportation", "overview"]
                }
            }
        },
        "required": ["country", "itinerary"]
    })
}
