//! Registration and password login.

use std::sync::Arc;

use domains::{
    Authenticator, DomainError, NewUser, PasswordHasher, Principal, Role, UserId, UserRepository,
};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Default)]
pub struct RegisterUser {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub contact_number: Option<String>,
    pub address: Option<String>,
}

/// A successful login: the bearer token and who it speaks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub role: Role,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    authenticator: Arc<dyn Authenticator>,
}

fn invalid_credentials() -> DomainError {
    DomainError::Unauthorized("invalid credentials".into())
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            users,
            hasher,
            authenticator,
        }
    }

    /// Creates a member account. Admins are only ever seeded.
    #[instrument(skip_all)]
    pub async fn register(&self, input: RegisterUser) -> Result<UserId, DomainError> {
        let email = input.email.trim().to_owned();
        if input.full_name.trim().is_empty() || email.is_empty() || input.password.is_empty() {
            return Err(DomainError::Validation(
                "fullName, email and password are required".into(),
            ));
        }
        if !email.contains('@') {
            return Err(DomainError::Validation(format!("invalid email address: {email}")));
        }

        let hasher = Arc::clone(&self.hasher);
        let password = input.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))??;

        let id = self
            .users
            .create(NewUser {
                full_name: input.full_name.trim().to_owned(),
                email,
                password_hash,
                contact_number: input.contact_number,
                address: input.address,
            })
            .await?;
        info!(user_id = %id, "user registered");
        Ok(id)
    }

    /// Unknown emails and wrong passwords fail the same way.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(DomainError::Validation(
                "email and password are required".into(),
            ));
        }

        let Some(account) = self.users.find_by_email(email).await? else {
            warn!("login for unknown email");
            return Err(invalid_credentials());
        };

        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();
        let stored = account.password_hash;
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if !matches {
            warn!(user_id = %account.user.id, "login with wrong password");
            return Err(invalid_credentials());
        }

        let principal = Principal::new(account.user.id, account.user.role);
        let token = self.authenticator.issue_token(&principal)?;
        info!(user_id = %principal.user_id, role = %principal.role, "logged in");
        Ok(Session {
            token,
            user_id: principal.user_id,
            role: principal.role,
        })
    }
}
