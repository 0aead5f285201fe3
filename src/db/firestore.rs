// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Owns the `user_history` collection: one document per subject, holding
//! that subject's previous generations in insertion order. All mutation
//! goes through `append_generation`; nothing else edits or removes
//! history entries.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Itinerary, UserHistory};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
    // Shared across clones so tests can observe writes through any handle.
    append_attempts: Arc<AtomicUsize>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
            append_attempts: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
            append_attempts: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            client: None,
            append_attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `append_generation` calls seen by this client (and its
    /// clones), whether or not the write succeeded.
    pub fn append_attempts(&self) -> usize {
        self.append_attempts.load(Ordering::Relaxed)
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── History Operations ──────────────────────────────────────

    /// Get a subject's generation history.
    pub async fn get_history(&self, subject_id: &str) -> Result<Option<UserHistory>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USER_HISTORY)
            .obj()
            .one(subject_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Append a finished itinerary to a subject's history.
    ///
    /// Creates the history document on first use, otherwise appends.
    /// Read-modify-write without a transaction: concurrent requests for
    /// the same subject are last-write-wins, an accepted consistency gap.
    pub async fn append_generation(
        &self,
        subject_id: &str,
        itinerary: &Itinerary,
    ) -> Result<(), AppError> {
        self.append_attempts.fetch_add(1, Ordering::Relaxed);

        let now = chrono::Utc::now().to_rfc3339();

        let mut history = self
            .get_history(subject_id)
            .await?
            .unwrap_or_else(|| UserHistory {
                subject_id: subject_id.to_string(),
                previous_generations: Vec::new(),
                created_at: now.clone(),
                updated_at: now.clone(),
            });

        history.previous_generations.push(itinerary.clone());
        history.updated_at = now;

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USER_HISTORY)
            .document_id(subject_id)
            .object(&history)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(
            subject_id,
            generations = history.previous_generations.len(),
            "History updated"
        );

        Ok(())
    }
}
