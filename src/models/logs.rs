//! Weight and workout log models for storage and API.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single body-weight measurement (`weightLogs` collection).
///
/// Immutable after creation except for deletion by its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightEntry {
    /// Entry ID (also used as document ID)
    pub id: String,
    /// Owning user ID
    pub user_id: String,
    /// Body weight in kilograms, always positive
    pub weight: f64,
    /// Calendar date of the measurement (RFC3339)
    pub date: String,
    /// When the entry was logged (RFC3339)
    pub created_at: String,
}

/// One exercise within a workout.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Exercise {
    #[validate(length(min = 1, message = "Exercise name is required"))]
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    /// Weight used, in kilograms (0 for bodyweight exercises)
    #[validate(range(min = 0.0))]
    pub weight: f64,
}

/// A logged workout session (`workoutLogs` collection).
///
/// Same lifecycle as [`WeightEntry`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutEntry {
    /// Entry ID (also used as document ID)
    pub id: String,
    /// Owning user ID
    pub user_id: String,
    /// Workout type label (e.g. "Push", "Legs")
    pub workout_type: String,
    /// Ordered, non-empty exercise list
    pub exercises: Vec<Exercise>,
    /// Calendar date of the workout (RFC3339)
    pub date: String,
    /// When the entry was logged (RFC3339)
    pub created_at: String,
}
