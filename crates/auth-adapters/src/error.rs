use domains::DomainError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("no token provided")]
    MissingToken,

    #[error("token has expired")]
    Expired,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token signing failed: {0}")]
    Signing(String),
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Hashing(msg) | AuthError::Signing(msg) => DomainError::Internal(msg),
            other => DomainError::Unauthorized(other.to_string()),
        }
    }
}
