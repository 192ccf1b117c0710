//! Credential hashing for the two-stage scheme: clients send a SHA-256 hex
//! digest of the real password, and only that digest is slow-hashed here.
//! The server never sees a plaintext password.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::errors::ServiceError;

/// Expected length of the client-side digest: hex-encoded SHA-256.
pub const CLIENT_DIGEST_LEN: usize = 64;

/// Syntactic check on the client pre-hash: exactly 64 hex characters.
pub fn is_valid_client_digest(digest: &str) -> bool {
    digest.len() == CLIENT_DIGEST_LEN && digest.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Hashes the client digest with argon2id and a fresh random salt, returning
/// the PHC string stored in `users.password_hash`.
pub fn hash_client_digest(digest: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(digest.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::HashError(e.to_string()))
}

/// Verifies a candidate client digest against a stored PHC string.
///
/// `Ok(false)` means a genuine mismatch. A stored hash that fails to parse is
/// an internal error, never treated as a mismatch: a corrupted row must not
/// look like a wrong password. The argon2 comparison itself is constant-time.
pub fn verify_client_digest(stored: &str, candidate: &str) -> Result<bool, ServiceError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| ServiceError::HashError(format!("stored password hash is malformed: {e}")))?;

    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(ServiceError::HashError(e.to_string())),
    }
}
