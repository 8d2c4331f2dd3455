// SPDX-License-Identifier: MIT

//! Trainer-link manager.
//!
//! Owns the trainee↔trainer relationship: invite code verification and
//! allocation, connecting, disconnecting, and roster lookup. The link is
//! stored by value (`trainerId` holds the trainer's invite code) — see
//! DESIGN.md for the inherited limitations of that layout.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::Profile;
use crate::services::ids;

/// Attempts at finding a collision-free invite code before giving up.
const CODE_ALLOCATION_ATTEMPTS: usize = 5;

/// Business logic for the trainee↔trainer linkage.
pub struct TrainerLinkService {
    db: FirestoreDb,
}

impl TrainerLinkService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Look up the trainer holding an invite code.
    ///
    /// Codes are matched case-insensitively by normalizing to uppercase.
    /// An unmatched code is `Ok(None)`, never an error.
    pub async fn verify_code(&self, code: &str) -> Result<Option<Profile>> {
        let code = normalize_code(code);
        self.db.find_trainer_by_code(&code).await
    }

    /// Link a trainee to the trainer holding `code`.
    ///
    /// Fails with `InvalidCode` when no trainer matches, leaving the
    /// trainee untouched. Reconnecting with the same code is a no-op
    /// success; a different code overwrites the old link (switch
    /// semantics, no explicit disconnect required).
    ///
    /// The verify-then-write sequence is not atomic: a trainer document
    /// changing between the two steps can leave a dangling link, which
    /// the design tolerates.
    pub async fn connect(&self, trainee_id: &str, code: &str) -> Result<Profile> {
        let code = normalize_code(code);

        let trainer = self
            .db
            .find_trainer_by_code(&code)
            .await?
            .ok_or(AppError::InvalidCode)?;

        let mut trainee = self
            .db
            .get_profile(trainee_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", trainee_id)))?;

        if trainee.trainer_id.as_deref() == Some(code.as_str()) {
            tracing::debug!(trainee_id, code = %code, "Already linked, skipping write");
            return Ok(trainer);
        }

        trainee.trainer_id = Some(code.clone());
        self.db.upsert_profile(&trainee).await?;

        tracing::info!(trainee_id, code = %code, "Trainee linked to trainer");

        Ok(trainer)
    }

    /// Unlink a trainee from their trainer. Idempotent.
    pub async fn disconnect(&self, trainee_id: &str) -> Result<()> {
        let mut trainee = self
            .db
            .get_profile(trainee_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", trainee_id)))?;

        if trainee.trainer_id.is_none() {
            tracing::debug!(trainee_id, "Already disconnected");
            return Ok(());
        }

        trainee.trainer_id = None;
        self.db.upsert_profile(&trainee).await?;

        tracing::info!(trainee_id, "Trainee unlinked from trainer");

        Ok(())
    }

    /// The roster: every profile linked to this invite code.
    pub async fn list_trainees(&self, invite_code: &str) -> Result<Vec<Profile>> {
        self.db.list_trainees(&normalize_code(invite_code)).await
    }

    /// Allocate a fresh invite code for a new trainer.
    ///
    /// Uniqueness is best-effort: each candidate is checked against the
    /// store and regenerated on collision. There is no transactional
    /// index, so two simultaneous allocations could still collide; with
    /// a 36^6 code space that window is accepted.
    pub async fn allocate_invite_code(&self) -> Result<String> {
        for _ in 0..CODE_ALLOCATION_ATTEMPTS {
            let candidate = ids::new_invite_code()?;
            if self.db.find_trainer_by_code(&candidate).await?.is_none() {
                return Ok(candidate);
            }
            tracing::warn!(code = %candidate, "Invite code collision, regenerating");
        }

        Err(AppError::Internal(anyhow::anyhow!(
            "Could not allocate a unique invite code after {} attempts",
            CODE_ALLOCATION_ATTEMPTS
        )))
    }
}

/// Normalize an invite code for comparison and storage: trimmed and
/// uppercased, so `"abc123"` and `"ABC123"` name the same trainer.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code_uppercases() {
        assert_eq!(normalize_code("abc123"), "ABC123");
        assert_eq!(normalize_code("AbC123"), "ABC123");
        assert_eq!(normalize_code("ABC123"), "ABC123");
    }

    #[test]
    fn test_normalize_code_trims_whitespace() {
        assert_eq!(normalize_code("  abc123 "), "ABC123");
    }
}
