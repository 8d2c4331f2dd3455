// SPDX-License-Identifier: MIT

//! Random identifier generation.

use crate::error::{AppError, Result};
use ring::rand::{SecureRandom, SystemRandom};

/// Alphabet for document IDs (Firestore auto-ID style).
const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Alphabet for invite codes: uppercase only, so codes survive the
/// uppercase normalization applied at verification time.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

const DOCUMENT_ID_LEN: usize = 20;

/// Length of a trainer invite code.
pub const INVITE_CODE_LEN: usize = 6;

/// Generate a new 20-character document ID.
pub fn new_document_id() -> Result<String> {
    random_string(ID_ALPHABET, DOCUMENT_ID_LEN)
}

/// Generate a candidate invite code. Uniqueness is checked by the caller.
pub fn new_invite_code() -> Result<String> {
    random_string(CODE_ALPHABET, INVITE_CODE_LEN)
}

/// Uniform random string over an alphabet, via rejection sampling.
fn random_string(alphabet: &[u8], len: usize) -> Result<String> {
    let rng = SystemRandom::new();
    // Largest multiple of the alphabet size that fits in a byte
    let limit = 256 - (256 % alphabet.len());

    let mut out = String::with_capacity(len);
    let mut buf = [0u8; 32];

    while out.len() < len {
        rng.fill(&mut buf)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG failure")))?;

        for &byte in buf.iter() {
            if (byte as usize) < limit {
                out.push(alphabet[byte as usize % alphabet.len()] as char);
                if out.len() == len {
                    break;
                }
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_shape() {
        let id = new_document_id().unwrap();
        assert_eq!(id.len(), DOCUMENT_ID_LEN);
        assert!(id.bytes().all(|b| ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_invite_code_is_uppercase_alphanumeric() {
        for _ in 0..50 {
            let code = new_invite_code().unwrap();
            assert_eq!(code.len(), INVITE_CODE_LEN);
            assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
            assert_eq!(code, code.to_uppercase());
        }
    }

    #[test]
    fn test_ids_are_not_repeating() {
        let a = new_document_id().unwrap();
        let b = new_document_id().unwrap();
        assert_ne!(a, b);
    }
}
