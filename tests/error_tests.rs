// SPDX-License-Identifier: MIT

//! Error-to-response mapping tests.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;
use shapeshift_api::error::AppError;

async fn render(err: AppError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_identity_error_statuses() {
    let (status, body) = render(AppError::InvalidCredentials).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");

    let (status, body) = render(AppError::AccountNotFound).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "account_not_found");

    let (status, body) = render(AppError::AccountAlreadyExists).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "account_exists");

    let (status, body) = render(AppError::WeakPassword).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "weak_password");

    let (status, body) = render(AppError::InvalidEmail).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_email");
}

#[tokio::test]
async fn test_linkage_error_statuses() {
    // Unmatched invite codes are indistinguishable from missing ones
    let (status, body) = render(AppError::InvalidCode).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "invalid_code");

    let (status, body) = render(AppError::Forbidden).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn test_generic_error_statuses() {
    let (status, _) = render(AppError::Unauthorized).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = render(AppError::NotFound("thing".to_string())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["details"], "thing");

    let (status, body) = render(AppError::BadRequest("nope".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "nope");
}

#[tokio::test]
async fn test_internal_errors_hide_details() {
    let (status, body) = render(AppError::Database("connection reset".to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.get("details"), None);

    let (status, body) = render(AppError::Internal(anyhow::anyhow!("boom"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.get("details"), None);
}
