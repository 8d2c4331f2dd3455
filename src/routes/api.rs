// SPDX-License-Identifier: MIT

//! Profile and onboarding routes for authenticated users.

use crate::access::dashboard_path;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::UserRole;
use crate::routes::session::ProfileResponse;
use crate::AppState;
use axum::{
    extract::State,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Routes requiring authentication (middleware applied in routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/onboarding", post(complete_onboarding))
        .route("/api/account", delete(delete_account))
}

// ─── Current Profile ─────────────────────────────────────────

/// Get the acting user's profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let profile = state
        .db
        .get_profile(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", user.user_id)))?;

    Ok(Json(ProfileResponse::from(profile)))
}

// ─── Onboarding ──────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    pub role: UserRole,
    /// Trainees may link to a trainer right away
    #[serde(default)]
    pub trainer_code: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct OnboardingResponse {
    pub profile: ProfileResponse,
    /// Dashboard the client should navigate to
    pub redirect: String,
}

/// Complete onboarding by selecting a role.
///
/// Trainers get an invite code generated here, once; the code is
/// immutable afterward, which is why a second role selection is
/// rejected outright.
async fn complete_onboarding(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<OnboardingRequest>,
) -> Result<Json<OnboardingResponse>> {
    let mut profile = state
        .db
        .get_profile(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", user.user_id)))?;

    if profile.role.is_some() {
        return Err(AppError::BadRequest("Role already selected".to_string()));
    }

    profile.role = Some(payload.role);

    match payload.role {
        UserRole::Trainer => {
            profile.invite_code = Some(state.links.allocate_invite_code().await?);
        }
        UserRole::Trainee => {}
    }

    state.db.upsert_profile(&profile).await?;

    // Link after the role is persisted, through the same verified path
    // used by the dashboard's connect flow.
    if payload.role == UserRole::Trainee {
        if let Some(code) = payload.trainer_code.as_deref().filter(|c| !c.is_empty()) {
            state.links.connect(&user.user_id, code).await?;
            // Re-read: connect mutated the profile document
            profile = state
                .db
                .get_profile(&user.user_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", user.user_id)))?;
        }
    }

    tracing::info!(
        user_id = %user.user_id,
        role = payload.role.as_str(),
        "Onboarding complete"
    );

    Ok(Json(OnboardingResponse {
        redirect: dashboard_path(payload.role).to_string(),
        profile: ProfileResponse::from(profile),
    }))
}

// ─── Account Deletion ────────────────────────────────────────

/// Response for account deletion.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteAccountResponse {
    pub success: bool,
    pub message: String,
}

/// Delete the acting user's account and all associated data.
///
/// Removes weight logs, workout logs, the profile, and finally the
/// sign-in credential. The session token becomes useless once the
/// profile is gone.
async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DeleteAccountResponse>> {
    tracing::info!(user_id = %user.user_id, "User-initiated account deletion");

    let profile = state
        .db
        .get_profile(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", user.user_id)))?;

    let deleted = state.db.delete_user_data(&user.user_id).await?;
    state
        .identity
        .delete_account_credential(&profile.email)
        .await?;

    Ok(Json(DeleteAccountResponse {
        success: true,
        message: format!("Account deleted ({} documents removed)", deleted),
    }))
}
