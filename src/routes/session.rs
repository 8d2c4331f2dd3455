// SPDX-License-Identifier: MIT

//! Public session-state and navigation routes.
//!
//! These never return 401: an absent or invalid token is simply an
//! unauthenticated session, and the navigation verdict says where to go.

use crate::access::{self, NavigationResponse, Route, SessionSnapshot};
use crate::error::{AppError, Result};
use crate::middleware::auth::{decode_session, SESSION_COOKIE};
use crate::models::{Profile, UserRole};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/session", get(get_session))
        .route("/session/navigate", get(navigate))
}

/// Profile as returned by the API.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trainer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_code: Option<String>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            email: profile.email,
            name: profile.name,
            role: profile.role,
            trainer_id: profile.trainer_id,
            invite_code: profile.invite_code,
        }
    }
}

/// Current session state: who is signed in and what profile they have.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionStateResponse {
    pub principal: Option<String>,
    pub profile: Option<ProfileResponse>,
}

/// Resolve the session from an optional token (cookie or bearer header).
///
/// Invalid tokens are treated as no session rather than an error.
async fn resolve_session(
    state: &Arc<AppState>,
    jar: &CookieJar,
    headers: &HeaderMap,
) -> Result<SessionSnapshot> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(|t| t.to_string())
        });

    let principal = token.and_then(|t| decode_session(&t, &state.config.jwt_signing_key));

    let profile = match &principal {
        Some(user_id) => state.db.get_profile(user_id).await?,
        None => None,
    };

    Ok(SessionSnapshot {
        loading: false,
        principal,
        profile,
    })
}

/// Get the current session snapshot. Never 401.
async fn get_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Json<SessionStateResponse>> {
    let session = resolve_session(&state, &jar, &headers).await?;

    Ok(Json(SessionStateResponse {
        principal: session.principal,
        profile: session.profile.map(ProfileResponse::from),
    }))
}

#[derive(Deserialize)]
struct NavigateQuery {
    /// Path the client wants to navigate to
    to: String,
}

/// Compute the access-control verdict for a navigation request.
///
/// Called by the client shell on every navigation and whenever session
/// state changes, so role changes mid-session take effect immediately.
async fn navigate(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
    Query(params): Query<NavigateQuery>,
) -> Result<Json<NavigationResponse>> {
    let route = Route::parse(&params.to)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown route: {}", params.to)))?;

    let session = resolve_session(&state, &jar, &headers).await?;
    let decision = access::evaluate_route(&session, route);

    tracing::debug!(
        to = %params.to,
        principal = ?session.principal,
        decision = ?decision,
        "Navigation evaluated"
    );

    Ok(Json(NavigationResponse::from(decision)))
}
