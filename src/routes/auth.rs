// SPDX-License-Identifier: MIT

//! Email/password authentication routes.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::models::Profile;
use crate::routes::session::ProfileResponse;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", get(logout))
}

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Session issued after a successful signup or login.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub token: String,
    pub profile: ProfileResponse,
}

/// Issue a session token and the cookie carrying it.
fn issue_session(
    state: &Arc<AppState>,
    jar: CookieJar,
    profile: Profile,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let token = create_jwt(&profile.id, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((
        jar.add(cookie),
        Json(SessionResponse {
            token,
            profile: ProfileResponse::from(profile),
        }),
    ))
}

/// Create an account and start a session.
async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<SignupRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let profile = state
        .identity
        .sign_up(&payload.email, &payload.password, &payload.name)
        .await?;

    issue_session(&state, jar, profile)
}

/// Sign in to an existing account.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let profile = state
        .identity
        .sign_in(&payload.email, &payload.password)
        .await?;

    issue_session(&state, jar, profile)
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LogoutResponse {
    pub success: bool,
}

/// End the session by clearing the cookie. The bearer token, if the
/// client kept one, simply expires.
async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    (jar, Json(LogoutResponse { success: true }))
}
