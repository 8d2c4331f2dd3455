// SPDX-License-Identifier: MIT

//! Trainer-linkage routes: connect/disconnect for trainees, roster and
//! read-only trainee progress for trainers.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Profile, UserRole};
use crate::routes::logs::{WeightLogsResponse, WorkoutLogsResponse};
use crate::routes::session::ProfileResponse;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Routes requiring authentication (middleware applied in routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/trainer",
            get(get_linked_trainer).delete(disconnect_trainer),
        )
        .route("/api/trainer/connect", post(connect_trainer))
        .route("/api/trainees", get(list_trainees))
        .route("/api/trainees/{id}/weights", get(get_trainee_weights))
        .route("/api/trainees/{id}/workouts", get(get_trainee_workouts))
}

/// Fetch the acting profile, requiring a specific role.
async fn require_role(
    state: &Arc<AppState>,
    user_id: &str,
    role: UserRole,
) -> Result<Profile> {
    let profile = state
        .db
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", user_id)))?;

    if profile.role != Some(role) {
        return Err(AppError::Forbidden);
    }

    Ok(profile)
}

// ─── Trainee Side ────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LinkedTrainerResponse {
    /// The trainer the acting trainee is linked to, if any
    pub trainer: Option<ProfileResponse>,
}

/// Get the acting trainee's linked trainer.
///
/// A dangling link (code no longer matching any trainer) reports as
/// unlinked rather than failing.
async fn get_linked_trainer(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LinkedTrainerResponse>> {
    let profile = require_role(&state, &user.user_id, UserRole::Trainee).await?;

    let trainer = match profile.trainer_id.as_deref() {
        Some(code) => state.links.verify_code(code).await?,
        None => None,
    };

    Ok(Json(LinkedTrainerResponse {
        trainer: trainer.map(ProfileResponse::from),
    }))
}

#[derive(Deserialize)]
pub struct ConnectRequest {
    pub code: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ConnectResponse {
    pub trainer: ProfileResponse,
    /// The trainee profile after the link was written
    pub profile: ProfileResponse,
}

/// Link the acting trainee to a trainer by invite code.
///
/// Switch semantics: connecting with a new code replaces the old link.
async fn connect_trainer(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ConnectRequest>,
) -> Result<Json<ConnectResponse>> {
    require_role(&state, &user.user_id, UserRole::Trainee).await?;

    let trainer = state.links.connect(&user.user_id, &payload.code).await?;

    // Refresh the trainee profile; connect mutated it.
    let profile = state
        .db
        .get_profile(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", user.user_id)))?;

    Ok(Json(ConnectResponse {
        trainer: ProfileResponse::from(trainer),
        profile: ProfileResponse::from(profile),
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DisconnectResponse {
    pub success: bool,
    pub profile: ProfileResponse,
}

/// Unlink the acting trainee from their trainer. Idempotent.
async fn disconnect_trainer(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DisconnectResponse>> {
    require_role(&state, &user.user_id, UserRole::Trainee).await?;

    state.links.disconnect(&user.user_id).await?;

    let profile = state
        .db
        .get_profile(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", user.user_id)))?;

    Ok(Json(DisconnectResponse {
        success: true,
        profile: ProfileResponse::from(profile),
    }))
}

// ─── Trainer Side ────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RosterResponse {
    pub trainees: Vec<ProfileResponse>,
}

/// List the acting trainer's roster.
async fn list_trainees(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<RosterResponse>> {
    let profile = require_role(&state, &user.user_id, UserRole::Trainer).await?;

    let invite_code = profile.invite_code.as_deref().ok_or_else(|| {
        AppError::BadRequest("Trainer profile has no invite code".to_string())
    })?;

    let trainees = state.links.list_trainees(invite_code).await?;

    tracing::debug!(
        user_id = %user.user_id,
        count = trainees.len(),
        "Roster fetched"
    );

    Ok(Json(RosterResponse {
        trainees: trainees.into_iter().map(ProfileResponse::from).collect(),
    }))
}

/// Verify the acting trainer may read a trainee's data: the trainee
/// must currently be linked to the trainer's invite code.
async fn authorize_trainee_read(
    state: &Arc<AppState>,
    trainer_user_id: &str,
    trainee_id: &str,
) -> Result<Profile> {
    let trainer = require_role(state, trainer_user_id, UserRole::Trainer).await?;

    let trainee = state
        .db
        .get_profile(trainee_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", trainee_id)))?;

    let linked = match (&trainee.trainer_id, &trainer.invite_code) {
        (Some(trainer_id), Some(code)) => trainer_id == code,
        _ => false,
    };

    if !linked {
        tracing::warn!(
            trainer = %trainer_user_id,
            trainee = %trainee_id,
            "Rejected unlinked trainee read"
        );
        return Err(AppError::Forbidden);
    }

    Ok(trainee)
}

/// Read-only view of a linked trainee's weight logs.
async fn get_trainee_weights(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(trainee_id): Path<String>,
) -> Result<Json<WeightLogsResponse>> {
    authorize_trainee_read(&state, &user.user_id, &trainee_id).await?;

    let entries = state.db.list_weight_logs(&trainee_id).await?;
    Ok(Json(WeightLogsResponse::from_entries(entries)))
}

/// Read-only view of a linked trainee's workout logs.
async fn get_trainee_workouts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(trainee_id): Path<String>,
) -> Result<Json<WorkoutLogsResponse>> {
    authorize_trainee_read(&state, &user.user_id, &trainee_id).await?;

    let entries = state.db.list_workout_logs(&trainee_id).await?;
    Ok(Json(WorkoutLogsResponse::from_entries(entries)))
}
