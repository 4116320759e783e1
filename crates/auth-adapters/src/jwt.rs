//! HS256 bearer tokens carrying the user id and user type.

use chrono::{Duration, Utc};
use domains::{DomainError, Principal, Role, UserId};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;

/// Token lifetime when none is configured.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    #[serde(rename = "userType")]
    pub user_type: String,
    pub exp: u64,
}

pub struct JwtAuthenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtAuthenticator {
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation: Validation::default(),
            ttl,
        }
    }

    pub fn issue(&self, user_id: UserId, role: Role) -> Result<String, AuthError> {
        let exp = (Utc::now() + self.ttl).timestamp().max(0) as u64;
        let claims = Claims {
            id: user_id.0,
            user_type: role.as_user_type().to_owned(),
            exp,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::MissingToken);
        }
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }
}

impl domains::Authenticator for JwtAuthenticator {
    fn authenticate(&self, token: &str) -> Result<Principal, DomainError> {
        let claims = self.verify(token).inspect_err(|e| debug!(error = %e, "rejected token"))?;
        Ok(Principal::new(
            UserId(claims.id),
            Role::from_user_type(&claims.user_type),
        ))
    }

    fn issue_token(&self, principal: &Principal) -> Result<String, DomainError> {
        Ok(self.issue(principal.user_id, principal.role)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator(ttl: Duration) -> JwtAuthenticator {
        JwtAuthenticator::new(&SecretString::from("test-secret".to_owned()), ttl)
    }

    #[test]
    fn issued_token_round_trips_to_principal() {
        use domains::Authenticator;

        let auth = authenticator(Duration::hours(1));
        let token = auth.issue(UserId(3), Role::Member).unwrap();
        let principal = auth.authenticate(&token).unwrap();
        assert_eq!(principal, Principal::new(UserId(3), Role::Member));

        let claims = auth.verify(&token).unwrap();
        assert_eq!(claims.user_type, "User");
    }

    #[test]
    fn port_issued_token_keeps_the_admin_role() {
        use domains::Authenticator;

        let auth = authenticator(Duration::hours(1));
        let admin = Principal::new(UserId(1), Role::Admin);
        let token = auth.issue_token(&admin).unwrap();
        assert_eq!(auth.authenticate(&token).unwrap(), admin);
    }

    #[test]
    fn claims_use_camel_case_user_type() {
        let json = serde_json::to_value(Claims {
            id: 1,
            user_type: "Admin".into(),
            exp: 0,
        })
        .unwrap();
        assert_eq!(json["userType"], "Admin");
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = authenticator(Duration::hours(-2));
        let token = auth.issue(UserId(3), Role::Member).unwrap();
        assert_eq!(auth.verify(&token), Err(AuthError::Expired));
    }

    #[test]
    fn foreign_signature_is_unauthorized() {
        use domains::Authenticator;

        let token = authenticator(Duration::hours(1))
            .issue(UserId(1), Role::Admin)
            .unwrap();
        let other = JwtAuthenticator::new(&SecretString::from("other".to_owned()), Duration::hours(1));
        assert!(matches!(
            other.authenticate(&token),
            Err(DomainError::Unauthorized(_))
        ));
    }
}
