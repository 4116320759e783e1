//! # Owner-or-admin rule
//!
//! The single authorization predicate shared by reports, forum posts,
//! comments and application status changes. Callers resolve the
//! resource first: a missing resource is a `NotFound`, decided before
//! this predicate ever runs.

use crate::errors::DomainError;
use crate::models::{Principal, UserId};

/// Outcome of the owner-or-admin check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Permit,
    Deny,
}

/// Permits iff the requester owns the resource or is an administrator.
pub fn owner_or_admin(owner: UserId, requester: &Principal) -> Decision {
    if requester.user_id == owner || requester.is_admin() {
        Decision::Permit
    } else {
        Decision::Deny
    }
}

/// `owner_or_admin` as a `Result`, naming the resource in the denial.
pub fn ensure_owner_or_admin(
    owner: UserId,
    requester: &Principal,
    resource: &str,
) -> Result<(), DomainError> {
    match owner_or_admin(owner, requester) {
        Decision::Permit => Ok(()),
        Decision::Deny => Err(DomainError::Forbidden(format!(
            "you are not authorized to modify this {resource}"
        ))),
    }
}

/// Admin-only operations (application removal, global listings).
pub fn ensure_admin(requester: &Principal, action: &str) -> Result<(), DomainError> {
    if requester.is_admin() {
        Ok(())
    } else {
        Err(DomainError::Forbidden(format!("only administrators may {action}")))
    }
}
