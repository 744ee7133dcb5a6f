//! Credential hashing for the secondary password path.
//!
//! Credentials are Argon2id-hashed with a fresh 16-byte salt per call; the
//! PHC string output is safe to store in a text column. Verification treats
//! malformed hashes as a mismatch so callers never see an error-type side
//! channel.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use rand::rngs::OsRng;

use super::error::GateError;

/// Hash a plaintext credential into a self-describing PHC string.
///
/// Each call generates a fresh random salt, so two hashes of the same
/// plaintext are never bit-equal.
///
/// # Errors
/// Returns an error only if the hasher itself fails; never for the content
/// of the plaintext.
pub fn hash_credential(plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|_| anyhow!("failed to hash credential"))?;
    Ok(hash.to_string())
}

/// Verify a plaintext credential against a stored hash.
///
/// Returns `false` on mismatch, malformed hash, or internal error; the
/// stored hash is never mutated.
#[must_use]
pub fn verify_credential(plaintext: &str, stored_hash: &str) -> bool {
    match parse_credential_hash(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Parse a stored PHC string, rejecting wrong algorithm tags and corrupt
/// encodings.
pub(crate) fn parse_credential_hash(stored_hash: &str) -> Result<PasswordHash<'_>, GateError> {
    PasswordHash::new(stored_hash).map_err(|_| GateError::MalformedCredentialHash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_matching_plaintext() {
        let hash = hash_credential("correct horse battery staple").unwrap();
        assert!(verify_credential("correct horse battery staple", &hash));
    }

    #[test]
    fn verify_rejects_wrong_plaintext() {
        let hash = hash_credential("correct horse battery staple").unwrap();
        assert!(!verify_credential("incorrect horse", &hash));
    }

    #[test]
    fn hashes_of_same_plaintext_differ() {
        let first = hash_credential("swordfish").unwrap();
        let second = hash_credential("swordfish").unwrap();
        assert_ne!(first, second);
        assert!(verify_credential("swordfish", &first));
        assert!(verify_credential("swordfish", &second));
    }

    #[test]
    fn hash_is_self_describing_argon2id() {
        let hash = hash_credential("swordfish").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn verify_rejects_malformed_hash_without_panicking() {
        assert!(!verify_credential("swordfish", "not-a-phc-string"));
        assert!(!verify_credential("swordfish", ""));
        assert!(!verify_credential("swordfish", "$bogus$v=0$garbage"));
    }

    #[test]
    fn parse_rejects_malformed_hash() {
        let err = parse_credential_hash("corrupt").unwrap_err();
        assert!(matches!(err, GateError::MalformedCredentialHash));
    }
}
