// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Profiles (role and trainer linkage)
//! - Credentials (sign-in records)
//! - Weight logs and workout logs (append-mostly, owner-scoped)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Credential, Profile, UserRole, WeightEntry, WorkoutEntry};
// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
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
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get a profile by principal ID.
    pub async fn get_profile(&self, id: &str) -> Result<Option<Profile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace a profile.
    ///
    /// The document is always keyed by `profile.id`, so callers can never
    /// move a profile to a different key.
    pub async fn upsert_profile(&self, profile: &Profile) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&profile.id)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Find the trainer profile holding a given invite code.
    ///
    /// Compound equality query: `inviteCode == code AND role == TRAINER`.
    /// Returns `None` for an unmatched code; that is not an error.
    pub async fn find_trainer_by_code(&self, code: &str) -> Result<Option<Profile>, AppError> {
        let code = code.to_string();
        let profiles: Vec<Profile> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| {
                q.for_all([
                    q.field("inviteCode").eq(code.clone()),
                    q.field("role").eq(UserRole::Trainer.as_str()),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(profiles.into_iter().next())
    }

    /// All trainee profiles linked to a given invite code (the roster).
    ///
    /// No pagination; rosters are small. Ordering is store default.
    pub async fn list_trainees(&self, invite_code: &str) -> Result<Vec<Profile>, AppError> {
        let invite_code = invite_code.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("trainerId").eq(invite_code.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Credential Operations ───────────────────────────────────

    /// Get a sign-in credential by normalized email.
    pub async fn get_credential(&self, email: &str) -> Result<Option<Credential>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::CREDENTIALS)
            .obj()
            .one(email)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a sign-in credential, keyed by its normalized email.
    pub async fn set_credential(&self, credential: &Credential) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::CREDENTIALS)
            .document_id(&credential.email)
            .object(credential)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a credential (account removal).
    pub async fn delete_credential(&self, email: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::CREDENTIALS)
            .document_id(email)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Weight Log Operations ───────────────────────────────────

    /// Store a weight entry, keyed by its pre-generated entry ID.
    pub async fn add_weight_log(&self, entry: &WeightEntry) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::WEIGHT_LOGS)
            .document_id(&entry.id)
            .object(entry)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// All weight entries owned by a user, newest first.
    pub async fn list_weight_logs(&self, user_id: &str) -> Result<Vec<WeightEntry>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WEIGHT_LOGS)
            .filter(move |q| q.field("userId").eq(user_id.clone()))
            .order_by([("date", firestore::FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a weight entry after verifying ownership.
    ///
    /// The entry's `userId` must match the acting user; a mismatch is
    /// reported as not-found so entry IDs don't leak across users.
    pub async fn delete_weight_log(&self, entry_id: &str, user_id: &str) -> Result<(), AppError> {
        let entry: Option<WeightEntry> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::WEIGHT_LOGS)
            .obj()
            .one(entry_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let entry = entry
            .ok_or_else(|| AppError::NotFound(format!("Weight entry {} not found", entry_id)))?;

        if entry.user_id != user_id {
            tracing::warn!(
                entry_id,
                owner = %entry.user_id,
                actor = %user_id,
                "Refusing cross-user weight log deletion"
            );
            return Err(AppError::NotFound(format!(
                "Weight entry {} not found",
                entry_id
            )));
        }

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::WEIGHT_LOGS)
            .document_id(entry_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Workout Log Operations ──────────────────────────────────

    /// Store a workout entry, keyed by its pre-generated entry ID.
    pub async fn add_workout_log(&self, entry: &WorkoutEntry) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::WORKOUT_LOGS)
            .document_id(&entry.id)
            .object(entry)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// All workout entries owned by a user, newest first.
    pub async fn list_workout_logs(&self, user_id: &str) -> Result<Vec<WorkoutEntry>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUT_LOGS)
            .filter(move |q| q.field("userId").eq(user_id.clone()))
            .order_by([("date", firestore::FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a workout entry after verifying ownership.
    pub async fn delete_workout_log(&self, entry_id: &str, user_id: &str) -> Result<(), AppError> {
        let entry: Option<WorkoutEntry> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::WORKOUT_LOGS)
            .obj()
            .one(entry_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let entry = entry
            .ok_or_else(|| AppError::NotFound(format!("Workout entry {} not found", entry_id)))?;

        if entry.user_id != user_id {
            tracing::warn!(
                entry_id,
                owner = %entry.user_id,
                actor = %user_id,
                "Refusing cross-user workout log deletion"
            );
            return Err(AppError::NotFound(format!(
                "Workout entry {} not found",
                entry_id
            )));
        }

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::WORKOUT_LOGS)
            .document_id(entry_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Helper Methods ──────────────────────────────────────────

    /// Helper to batch delete documents using transactions.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        let client = self.get_client()?;

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }

    // ─── User Data Deletion ──────────────────────────────────────

    /// Delete ALL data for a user (account removal).
    ///
    /// Deletes from all collections:
    /// - `weightLogs` (query by userId)
    /// - `workoutLogs` (query by userId)
    /// - `users/{id}`
    ///
    /// The credential is deleted separately by the caller, which holds
    /// the email.
    ///
    /// Returns the number of documents deleted.
    pub async fn delete_user_data(&self, user_id: &str) -> Result<usize, AppError> {
        let mut deleted_count = 0;

        // 1. Delete all weight logs
        let weights = self.list_weight_logs(user_id).await?;
        let count = weights.len();
        self.batch_delete(&weights, collections::WEIGHT_LOGS, |entry: &WeightEntry| {
            entry.id.clone()
        })
        .await?;
        deleted_count += count;
        tracing::debug!(user_id, count, "Deleted weight logs");

        // 2. Delete all workout logs
        let workouts = self.list_workout_logs(user_id).await?;
        let count = workouts.len();
        self.batch_delete(
            &workouts,
            collections::WORKOUT_LOGS,
            |entry: &WorkoutEntry| entry.id.clone(),
        )
        .await?;
        deleted_count += count;
        tracing::debug!(user_id, count, "Deleted workout logs");

        // 3. Delete the profile
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(user_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        deleted_count += 1;
        tracing::debug!(user_id, "Deleted profile");

        tracing::info!(user_id, deleted_count, "User data deletion complete");

        Ok(deleted_count)
    }
}
