use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use domains::DomainError;

use crate::error::AuthError;

/// Argon2id with the crate defaults, behind the `PasswordHasher` port.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl domains::PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        Ok(hash_password(password)?)
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        verify_password(password, hash)
    }
}

/// Hashes a password into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Returns false for a mismatch and for a malformed stored hash alike.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
