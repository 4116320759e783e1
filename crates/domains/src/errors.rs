//! # DomainError
//!
//! Centralized error handling for the PetHub workspace.
//! Every port returns this type so services can decide, per call site,
//! whether a failure short-circuits the request or is merely logged.

use thiserror::Error;

/// The primary error type for all domain and service operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Referenced entity is absent (e.g., Application, Pet, Report)
    #[error("{0} not found with ID {1}")]
    NotFound(&'static str, String),

    /// Missing or malformed input; the caller's fault.
    #[error("validation error: {0}")]
    Validation(String),

    /// The owner-or-admin rule (or an admin-only rule) denied the request.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// No usable credentials were presented.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Relational store failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// A secondary effect (pet cascade, mail delivery) failed.
    /// Logged by services, never surfaced to HTTP callers.
    #[error("soft dependency failed: {0}")]
    SoftDependency(String),

    /// State the workflow cannot explain, e.g. a row vanishing between
    /// a write and its read-back.
    #[error("internal service error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound(entity, id.to_string())
    }

    /// True for errors that are the caller's fault rather than ours.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(..) | Self::Validation(_) | Self::Forbidden(_) | Self::Unauthorized(_)
        )
    }
}

/// A specialized Result type for PetHub logic.
pub type Result<T> = std::result::Result<T, DomainError>;
