use serde::{Deserialize, Serialize};
use std::fmt;

use super::UserId;

/// The `UserType` column value that grants administrative rights.
pub const ADMIN_USER_TYPE: &str = "Admin";

/// A principal's role. Anything that is not `Admin` is an ordinary member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    /// Maps the stored/issued user type string onto a role.
    pub fn from_user_type(user_type: &str) -> Self {
        if user_type == ADMIN_USER_TYPE {
            Role::Admin
        } else {
            Role::Member
        }
    }

    pub fn as_user_type(&self) -> &'static str {
        match self {
            Role::Admin => ADMIN_USER_TYPE,
            Role::Member => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_user_type())
    }
}

/// The verified (requester, role) pair attached to one request.
///
/// Produced by an `Authenticator` and passed explicitly into every
/// service call that needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// An account as the adoption workflow sees it: identity plus the
/// contact channels that end up in notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub role: Role,
    pub profile_photo: Option<String>,
}

/// A self-registered account before it has an id. Registration always
/// yields a `User` role; admins are seeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub contact_number: Option<String>,
    pub address: Option<String>,
}

/// A user together with the stored credential, as needed for login.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub user: User,
    pub password_hash: String,
}
