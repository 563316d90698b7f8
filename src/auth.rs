//! Bearer-token authentication.
//!
//! Login and registration issue an HS256 JWT whose claims are the
//! [`AuthenticatedUser`]. Protected routes take an `AuthenticatedUser`
//! argument; the [`FromRequest`] impl pulls the token out of the
//! `Authorization: Bearer` header and rejects the request with a JSON 401
//! before the handler runs. Password and reset-token hashing helpers live
//! here as well so no other module touches the crypto crates directly.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::user::{User, UserRole};
use crate::models::config::ServerConfig;
use crate::services::ServiceError;

/// Minutes a password reset token stays valid.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 10;

/// Claims carried by every issued token.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    /// User id, stringified.
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Expiration as a Unix timestamp.
    pub exp: usize,
    /// Issuance as a Unix timestamp.
    pub iat: usize,
}

impl AuthenticatedUser {
    #[must_use]
    pub fn new(user: &User, ttl_days: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::days(ttl_days);

        Self {
            sub: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            exp: exp.timestamp().max(0) as usize,
            iat: now.timestamp().max(0) as usize,
        }
    }

    /// Sign these claims into a compact JWT.
    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Verify a compact JWT and recover the claims. Expired or tampered
    /// tokens fail here.
    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }

    /// The numeric user id behind `sub`, if it still parses.
    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
        return Err(ServiceError::Internal("server configuration is not attached".into()).into());
    };

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    match token {
        Some(token) => {
            AuthenticatedUser::from_jwt(token, &config.secret).map_err(|_| unauthorized())
        }
        None => Err(unauthorized()),
    }
}

fn unauthorized() -> actix_web::Error {
    ServiceError::Unauthorized("Not authorized to access this route".into()).into()
}

/// True when the claims carry one of the listed roles.
#[must_use]
pub fn check_role(user: &AuthenticatedUser, roles: &[UserRole]) -> bool {
    roles.contains(&user.role)
}

/// Guard an operation behind a role list.
pub fn ensure_role(user: &AuthenticatedUser, roles: &[UserRole]) -> Result<(), ServiceError> {
    if check_role(user, roles) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(format!(
            "User role {} is not authorized to access this route",
            user.role
        )))
    }
}

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

/// Check a password attempt against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hash)
}

/// Mint a password reset token.
///
/// The first element is the plain token mailed to the user, the second the
/// SHA-256 digest persisted on the account. Only the digest ever touches
/// the database.
#[must_use]
pub fn generate_reset_token() -> (String, String) {
    let mut bytes = [0u8; 20];
    rand::rng().fill_bytes(&mut bytes);
    let token = hex::encode(bytes);
    let digest = hash_reset_token(&token);
    (token, digest)
}

/// Digest a plain reset token the same way [`generate_reset_token`] does.
#[must_use]
pub fn hash_reset_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 7,
            name: "Mary".into(),
            email: "mary@example.com".into(),
            role: UserRole::Publisher,
            password_hash: String::new(),
            reset_password_token: None,
            reset_password_expire: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn jwt_round_trip_preserves_claims() {
        let claims = AuthenticatedUser::new(&sample_user(), 30);
        let token = claims.to_jwt("secret").unwrap();
        let decoded = AuthenticatedUser::from_jwt(&token, "secret").unwrap();

        assert_eq!(decoded, claims);
        assert_eq!(decoded.user_id(), Some(7));
        assert_eq!(decoded.role, UserRole::Publisher);
    }

    #[test]
    fn jwt_rejects_wrong_secret() {
        let token = AuthenticatedUser::new(&sample_user(), 30)
            .to_jwt("secret")
            .unwrap();
        assert!(AuthenticatedUser::from_jwt(&token, "other").is_err());
    }

    #[test]
    fn reset_token_digest_is_stable_and_hex() {
        let (token, digest) = generate_reset_token();
        assert_eq!(token.len(), 40);
        assert_eq!(digest, hash_reset_token(&token));
        assert_ne!(digest, token);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("123456").unwrap();
        assert!(verify_password("123456", &hash).unwrap());
        assert!(!verify_password("654321", &hash).unwrap());
    }

    #[test]
    fn ensure_role_names_the_rejected_role() {
        let claims = AuthenticatedUser::new(&sample_user(), 30);

        assert!(ensure_role(&claims, &[UserRole::Publisher, UserRole::Admin]).is_ok());

        let err = ensure_role(&claims, &[UserRole::Admin]).unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(message)
            if message == "User role publisher is not authorized to access this route"));
    }
}
