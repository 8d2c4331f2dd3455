//! Profile and credential models for storage and API.

use serde::{Deserialize, Serialize};

/// The role a profile holds once onboarding is complete.
///
/// Stored as `"TRAINEE"` / `"TRAINER"` in Firestore. Adding a role is a
/// compile-time-checked change: the access controller and all role
/// switches match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Trainee,
    Trainer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Trainee => "TRAINEE",
            UserRole::Trainer => "TRAINER",
        }
    }
}

/// User profile stored in Firestore (`users` collection).
///
/// The document ID always equals `id`, which equals the owning
/// principal's ID; writes go through [`crate::db::FirestoreDb`] which
/// keys the document by `profile.id`, so the key cannot drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Principal ID (also used as document ID)
    pub id: String,
    /// Email address
    pub email: String,
    /// Display name
    pub name: String,
    /// None until onboarding completes
    pub role: Option<UserRole>,
    /// Trainees only: the linked trainer's invite code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainer_id: Option<String>,
    /// Trainers only: 6-character code, generated once at role selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_code: Option<String>,
}

impl Profile {
    /// A fresh profile with onboarding incomplete (no role, no linkage).
    pub fn new(id: String, email: String, name: String) -> Self {
        Self {
            id,
            email,
            name,
            role: None,
            trainer_id: None,
            invite_code: None,
        }
    }
}

/// Sign-in credential stored in Firestore (`credentials` collection),
/// keyed by normalized (lowercased) email.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// ID of the profile this credential signs in to
    pub user_id: String,
    /// Normalized email (matches the document ID)
    pub email: String,
    /// PBKDF2-HMAC-SHA256 output, hex-encoded
    pub password_hash: String,
    /// Per-credential salt, hex-encoded
    pub salt: String,
    /// When the account was created (RFC3339)
    pub created_at: String,
}
