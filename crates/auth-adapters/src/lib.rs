//! # auth-adapters
//!
//! Credential handling for the HTTP layer: argon2 password hashes and,
//! behind `auth-jwt`, bearer-token issuing and verification.

pub mod error;
pub mod password;

#[cfg(feature = "auth-jwt")]
pub mod jwt;

pub use error::AuthError;
pub use password::{hash_password, verify_password, Argon2Hasher};

#[cfg(feature = "auth-jwt")]
pub use jwt::{Claims, JwtAuthenticator};
