// SPDX-License-Identifier: MIT

//! Session token tests: creation, decoding, expiry.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use shapeshift_api::middleware::auth::{create_jwt, decode_session, Claims};

const KEY: &[u8] = b"test_jwt_key_32_bytes_minimum!!";
const OTHER_KEY: &[u8] = b"a_different_key_32_bytes_long!!";

#[test]
fn test_session_token_roundtrip() {
    let token = create_jwt("uid-abc-123", KEY).unwrap();
    assert_eq!(decode_session(&token, KEY), Some("uid-abc-123".to_string()));
}

#[test]
fn test_session_token_rejects_wrong_key() {
    let token = create_jwt("uid-abc-123", KEY).unwrap();
    assert_eq!(decode_session(&token, OTHER_KEY), None);
}

#[test]
fn test_session_token_rejects_tampering() {
    let token = create_jwt("uid-abc-123", KEY).unwrap();

    // Flip a character in the signature segment
    let mut tampered = token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    assert_eq!(decode_session(&tampered, KEY), None);
}

#[test]
fn test_session_token_expires_in_30_days() {
    let token = create_jwt("uid-abc-123", KEY).unwrap();

    let data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(KEY),
        &Validation::new(Algorithm::HS256),
    )
    .unwrap();

    assert_eq!(data.claims.sub, "uid-abc-123");
    assert_eq!(data.claims.exp - data.claims.iat, 30 * 24 * 60 * 60);
}

#[test]
fn test_garbage_token_is_not_a_session() {
    assert_eq!(decode_session("", KEY), None);
    assert_eq!(decode_session("not.a.jwt", KEY), None);
    assert_eq!(decode_session("a.b", KEY), None);
}
