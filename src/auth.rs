use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Bearer tokens expire 24 hours after issuance.
pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> Result<(), AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("stored password hash is invalid: {e}")))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AppError::Unauthorized("Incorrect password".to_string()))
}

pub fn issue_token(user_id: i64, email: &str, secret: &str) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))
}

/// Any verification failure collapses into the same unauthorized error;
/// callers cannot distinguish a forged token from an expired one.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("s3cret-password").expect("hash");
        assert!(verify_password("s3cret-password", &hash).is_ok());
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("s3cret-password").expect("hash");
        assert!(verify_password("wrong-password", &hash).is_err());
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("same-password").expect("hash");
        let second = hash_password("same-password").expect("hash");
        assert_ne!(first, second);
    }

    #[test]
    fn token_round_trip_preserves_claims() {
        let token = issue_token(42, "buyer@shop.example", SECRET).expect("token");
        let claims = verify_token(&token, SECRET).expect("claims");

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "buyer@shop.example");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn token_rejected_with_wrong_secret() {
        let token = issue_token(42, "buyer@shop.example", SECRET).expect("token");
        assert!(verify_token(&token, "another-secret").is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let past = Utc::now() - Duration::hours(2 * TOKEN_TTL_HOURS);
        let claims = Claims {
            sub: 7,
            email: "buyer@shop.example".to_string(),
            iat: past.timestamp(),
            exp: (past + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("token");

        assert!(verify_token(&token, SECRET).is_err());
    }

    #[test]
    fn garbage_token_rejected() {
        assert!(verify_token("not-a-jwt", SECRET).is_err());
        assert!(verify_token("", SECRET).is_err());
    }
}
