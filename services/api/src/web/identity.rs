//! services/api/src/web/identity.rs
//!
//! Bearer-credential handling: issuing signed tokens at login/signup and
//! resolving them back into a caller identity on every protected request.
//! Validation is synchronous and in-process; no lookup leaves the handler.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use showtimex_core::domain::{Identity, Role, User};

/// The claims carried inside a bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The account email.
    pub sub: String,
    pub user_id: i64,
    pub role: String,
    pub username: String,
    /// Expiry, in seconds since the epoch.
    pub exp: i64,
}

/// Why a bearer credential could not be resolved to an identity.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Authorization header required")]
    Missing,
    #[error("Token expired")]
    Expired,
    #[error("Invalid token")]
    Invalid,
}

/// Issues a signed token for `user`, valid for `ttl_minutes` from now.
pub fn issue_token(
    user: &User,
    secret: &str,
    ttl_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user.email.clone(),
        user_id: user.id,
        role: user.role.to_string(),
        username: user.username.clone(),
        exp: (Utc::now() + Duration::minutes(ttl_minutes)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verifies a token's signature and expiry and resolves the caller identity.
///
/// The identity lives for this request only; nothing is cached or persisted.
pub fn resolve_token(token: &str, secret: &str) -> Result<Identity, CredentialError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => CredentialError::Expired,
        _ => CredentialError::Invalid,
    })?;

    let role: Role = data
        .claims
        .role
        .parse()
        .map_err(|_| CredentialError::Invalid)?;

    Ok(Identity {
        user_id: data.claims.user_id,
        role,
        username: data.claims.username,
    })
}

/// Pulls the raw token out of an `Authorization` header value.
///
/// Accepts both `Bearer <token>` and a bare token, matching what the web
/// client has historically sent.
pub fn bearer_token(header_value: &str) -> &str {
    match header_value.split_once(' ') {
        Some((_, token)) => token,
        None => header_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    fn sample_user(role: Role) -> User {
        User {
            id: 42,
            email: "alice@example.com".to_string(),
            username: "alice".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Doe".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    fn encode_claims(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn issued_tokens_resolve_to_the_same_identity() {
        let token = issue_token(&sample_user(Role::Admin), SECRET, 30).unwrap();
        let identity = resolve_token(&token, SECRET).unwrap();
        assert_eq!(identity.user_id, 42);
        assert_eq!(identity.role, Role::Admin);
        assert_eq!(identity.username, "alice");
    }

    #[test]
    fn expired_tokens_are_rejected_as_expired() {
        let claims = Claims {
            sub: "alice@example.com".to_string(),
            user_id: 42,
            role: "user".to_string(),
            username: "alice".to_string(),
            exp: (Utc::now() - Duration::hours(1)).timestamp(),
        };
        let token = encode_claims(&claims, SECRET);
        let err = resolve_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, CredentialError::Expired));
    }

    #[test]
    fn tokens_signed_with_another_secret_are_invalid() {
        let token = issue_token(&sample_user(Role::User), "other-secret", 30).unwrap();
        let err = resolve_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, CredentialError::Invalid));
    }

    #[test]
    fn unknown_role_claims_are_invalid() {
        let claims = Claims {
            sub: "alice@example.com".to_string(),
            user_id: 42,
            role: "superuser".to_string(),
            username: "alice".to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode_claims(&claims, SECRET);
        let err = resolve_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, CredentialError::Invalid));
    }

    #[test]
    fn bearer_prefix_is_optional() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), "abc.def.ghi");
        assert_eq!(bearer_token("abc.def.ghi"), "abc.def.ghi");
    }
}
