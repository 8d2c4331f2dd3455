// SPDX-License-Identifier: MIT

//! Identity service: account creation and password sign-in.
//!
//! Credentials live in their own collection keyed by normalized email;
//! passwords are stored as PBKDF2-HMAC-SHA256 hashes with per-credential
//! salts. Session tokens themselves are issued at the route layer.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{Credential, Profile};
use crate::services::ids;
use crate::time_utils::now_rfc3339;
use ring::rand::{SecureRandom, SystemRandom};
use std::num::NonZeroU32;
use validator::ValidateEmail;

const PBKDF2_ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;
const MIN_PASSWORD_CHARS: usize = 6;
const MIN_NAME_CHARS: usize = 2;

/// Account management over the credentials and users collections.
pub struct IdentityService {
    db: FirestoreDb,
}

impl IdentityService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Create a new account and its role-less profile.
    ///
    /// The profile starts with `role: null`; onboarding fills it in later.
    pub async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<Profile> {
        let email = normalize_email(email);
        if !email.validate_email() {
            return Err(AppError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AppError::WeakPassword);
        }
        let name = name.trim();
        if name.chars().count() < MIN_NAME_CHARS {
            return Err(AppError::BadRequest(
                "Name must be at least 2 characters".to_string(),
            ));
        }

        if self.db.get_credential(&email).await?.is_some() {
            return Err(AppError::AccountAlreadyExists);
        }

        let user_id = ids::new_document_id()?;
        let (salt, password_hash) = hash_password(password)?;

        let credential = Credential {
            user_id: user_id.clone(),
            email: email.clone(),
            password_hash,
            salt,
            created_at: now_rfc3339(),
        };
        self.db.set_credential(&credential).await?;

        let profile = Profile::new(user_id.clone(), email, name.to_string());
        self.db.upsert_profile(&profile).await?;

        tracing::info!(user_id = %user_id, "Account created");

        Ok(profile)
    }

    /// Authenticate an email/password pair and return the profile.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Profile> {
        let email = normalize_email(email);

        let credential = self
            .db
            .get_credential(&email)
            .await?
            .ok_or(AppError::AccountNotFound)?;

        if !verify_password(password, &credential.salt, &credential.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let profile = self
            .db
            .get_profile(&credential.user_id)
            .await?
            .ok_or(AppError::AccountNotFound)?;

        tracing::info!(user_id = %profile.id, "Signed in");

        Ok(profile)
    }

    /// Remove the sign-in credential for an email.
    pub async fn delete_account_credential(&self, email: &str) -> Result<()> {
        self.db.delete_credential(&normalize_email(email)).await
    }
}

/// Lowercased, trimmed email used as the credential key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hash a password with a fresh random salt.
///
/// Returns `(salt_hex, hash_hex)`.
fn hash_password(password: &str) -> Result<(String, String)> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG failure")))?;

    let mut hash = [0u8; HASH_LEN];
    ring::pbkdf2::derive(
        ring::pbkdf2::PBKDF2_HMAC_SHA256,
        NonZeroU32::new(PBKDF2_ITERATIONS).expect("iterations is non-zero"),
        &salt,
        password.as_bytes(),
        &mut hash,
    );

    Ok((hex::encode(salt), hex::encode(hash)))
}

/// Constant-time password check against a stored salt/hash pair.
fn verify_password(password: &str, salt_hex: &str, hash_hex: &str) -> Result<bool> {
    let salt = hex::decode(salt_hex)
        .map_err(|_| AppError::Database("Corrupt credential salt".to_string()))?;
    let hash = hex::decode(hash_hex)
        .map_err(|_| AppError::Database("Corrupt credential hash".to_string()))?;

    Ok(ring::pbkdf2::verify(
        ring::pbkdf2::PBKDF2_HMAC_SHA256,
        NonZeroU32::new(PBKDF2_ITERATIONS).expect("iterations is non-zero"),
        &salt,
        password.as_bytes(),
        &hash,
    )
    .is_ok())
}
