// SPDX-License-Identifier: MIT

//! Weight and workout log routes for authenticated users.
//!
//! All list queries are scoped to the acting user; deletion is
//! ownership-checked in the storage layer.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Exercise, WeightEntry, WorkoutEntry};
use crate::services::ids;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Routes requiring authentication (middleware applied in routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/weights", get(list_weights).post(add_weight))
        .route("/api/weights/{id}", delete(delete_weight))
        .route("/api/workouts", get(list_workouts).post(add_workout))
        .route("/api/workouts/{id}", delete(delete_workout))
}

/// Parse an optional RFC3339 date, defaulting to now.
fn parse_entry_date(date: Option<&str>) -> Result<String> {
    match date {
        Some(raw) => {
            let parsed = chrono::DateTime::parse_from_rfc3339(raw).map_err(|_| {
                AppError::BadRequest("Invalid 'date': must be RFC3339 datetime".to_string())
            })?;
            Ok(crate::time_utils::format_utc_rfc3339(
                parsed.with_timezone(&chrono::Utc),
            ))
        }
        None => Ok(now_rfc3339()),
    }
}

// ─── Weight Logs ─────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct WeightRequest {
    /// Body weight in kilograms; must be positive
    #[validate(range(exclusive_min = 0.0, message = "Weight must be positive"))]
    pub weight: f64,
    /// Measurement date (RFC3339); defaults to now
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct WeightEntryResponse {
    pub id: String,
    pub weight: f64,
    pub date: String,
    pub created_at: String,
}

impl From<WeightEntry> for WeightEntryResponse {
    fn from(entry: WeightEntry) -> Self {
        Self {
            id: entry.id,
            weight: entry.weight,
            date: entry.date,
            created_at: entry.created_at,
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeightLogsResponse {
    pub entries: Vec<WeightEntryResponse>,
}

impl WeightLogsResponse {
    pub fn from_entries(entries: Vec<WeightEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(WeightEntryResponse::from).collect(),
        }
    }
}

/// Log a weight measurement for the acting user.
async fn add_weight(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<WeightRequest>,
) -> Result<Json<WeightEntryResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let entry = WeightEntry {
        id: ids::new_document_id()?,
        user_id: user.user_id.clone(),
        weight: payload.weight,
        date: parse_entry_date(payload.date.as_deref())?,
        created_at: now_rfc3339(),
    };

    state.db.add_weight_log(&entry).await?;

    tracing::debug!(user_id = %user.user_id, entry_id = %entry.id, "Weight logged");

    Ok(Json(WeightEntryResponse::from(entry)))
}

/// List the acting user's weight entries, newest first.
async fn list_weights(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<WeightLogsResponse>> {
    let entries = state.db.list_weight_logs(&user.user_id).await?;
    Ok(Json(WeightLogsResponse::from_entries(entries)))
}

/// Delete one of the acting user's weight entries.
async fn delete_weight(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(entry_id): Path<String>,
) -> Result<Json<DeleteEntryResponse>> {
    state.db.delete_weight_log(&entry_id, &user.user_id).await?;
    Ok(Json(DeleteEntryResponse { success: true }))
}

// ─── Workout Logs ────────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRequest {
    #[validate(length(min = 1, message = "Workout type is required"))]
    pub workout_type: String,
    #[validate(length(min = 1, message = "At least one exercise is required"))]
    #[validate(nested)]
    pub exercises: Vec<Exercise>,
    /// Workout date (RFC3339); defaults to now
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutEntryResponse {
    pub id: String,
    pub workout_type: String,
    pub exercises: Vec<Exercise>,
    pub date: String,
    pub created_at: String,
}

impl From<WorkoutEntry> for WorkoutEntryResponse {
    fn from(entry: WorkoutEntry) -> Self {
        Self {
            id: entry.id,
            workout_type: entry.workout_type,
            exercises: entry.exercises,
            date: entry.date,
            created_at: entry.created_at,
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutLogsResponse {
    pub entries: Vec<WorkoutEntryResponse>,
}

impl WorkoutLogsResponse {
    pub fn from_entries(entries: Vec<WorkoutEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(WorkoutEntryResponse::from)
                .collect(),
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteEntryResponse {
    pub success: bool,
}

/// Log a workout session for the acting user.
async fn add_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<WorkoutRequest>,
) -> Result<Json<WorkoutEntryResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let entry = WorkoutEntry {
        id: ids::new_document_id()?,
        user_id: user.user_id.clone(),
        workout_type: payload.workout_type,
        exercises: payload.exercises,
        date: parse_entry_date(payload.date.as_deref())?,
        created_at: now_rfc3339(),
    };

    state.db.add_workout_log(&entry).await?;

    tracing::debug!(user_id = %user.user_id, entry_id = %entry.id, "Workout logged");

    Ok(Json(WorkoutEntryResponse::from(entry)))
}

/// List the acting user's workout entries, newest first.
async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<WorkoutLogsResponse>> {
    let entries = state.db.list_workout_logs(&user.user_id).await?;
    Ok(Json(WorkoutLogsResponse::from_entries(entries)))
}

/// Delete one of the acting user's workout entries.
async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(entry_id): Path<String>,
) -> Result<Json<DeleteEntryResponse>> {
    state
        .db
        .delete_workout_log(&entry_id, &user.user_id)
        .await?;
    Ok(Json(DeleteEntryResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_must_be_positive() {
        let req = WeightRequest {
            weight: 0.0,
            date: None,
        };
        assert!(req.validate().is_err());

        let req = WeightRequest {
            weight: -5.0,
            date: None,
        };
        assert!(req.validate().is_err());

        let req = WeightRequest {
            weight: 72.5,
            date: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_workout_requires_exercises() {
        let req = WorkoutRequest {
            workout_type: "Push".to_string(),
            exercises: vec![],
            date: None,
        };
        assert!(req.validate().is_err());

        let req = WorkoutRequest {
            workout_type: "Push".to_string(),
            exercises: vec![Exercise {
                name: "Bench Press".to_string(),
                sets: 3,
                reps: 8,
                weight: 60.0,
            }],
            date: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_exercise_name_required() {
        let req = WorkoutRequest {
            workout_type: "Pull".to_string(),
            exercises: vec![Exercise {
                name: "".to_string(),
                sets: 3,
                reps: 10,
                weight: 0.0,
            }],
            date: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_parse_entry_date_rejects_garbage() {
        assert!(parse_entry_date(Some("yesterday")).is_err());
        assert!(parse_entry_date(Some("2024-03-01T10:00:00Z")).is_ok());
        assert!(parse_entry_date(None).is_ok());
    }

    #[test]
    fn test_parse_entry_date_normalizes_to_utc() {
        let stored = parse_entry_date(Some("2024-03-01T10:00:00+02:00")).unwrap();
        assert_eq!(stored, "2024-03-01T08:00:00Z");
    }
}
