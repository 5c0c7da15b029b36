// ABOUTME: JWT-based user authentication and authorization system
// ABOUTME: Handles token generation and validation, password hashing, and reset tokens
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ServiceFlow

//! # Authentication and Session Management
//!
//! JWT-based authentication for the ServiceFlow catalog server. Tokens
//! are HS256-signed with a process-wide secret; passwords are hashed
//! with bcrypt; password-reset tokens are random strings stored only as
//! SHA-256 digests and compared in constant time.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::constants::{limits, service_names};
use crate::models::{User, UserRole};

/// Convert a duration to a human-readable format
fn humanize_duration(duration: Duration) -> String {
    let total_secs = duration.num_seconds().abs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;

    if hours > 0 {
        format!("{hours} hours")
    } else if minutes > 0 {
        format!("{minutes} minutes")
    } else {
        format!("{total_secs} seconds")
    }
}

/// `JWT` validation error with detailed information
#[derive(Debug, Clone)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired, if the claim could be read back
        expired_at: Option<DateTime<Utc>>,
    },
    /// Token signature is invalid
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper `JWT` format)
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl std::fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenExpired { expired_at } => match expired_at {
                Some(at) => {
                    let ago = Utc::now().signed_duration_since(*at);
                    write!(
                        f,
                        "JWT token expired {} ago at {}",
                        humanize_duration(ago),
                        at.format("%Y-%m-%d %H:%M:%S UTC")
                    )
                }
                None => write!(f, "JWT token has expired"),
            },
            Self::TokenInvalid { reason } => {
                write!(f, "JWT token signature is invalid: {reason}")
            }
            Self::TokenMalformed { details } => {
                write!(f, "JWT token is malformed: {details}")
            }
        }
    }
}

impl std::error::Error for JwtValidationError {}

/// `JWT` claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User `ID`
    pub sub: String,
    /// User email
    pub email: String,
    /// Account role carried so route guards need no database lookup
    pub role: UserRole,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Audience (who the token is intended for)
    pub aud: String,
}

/// Authentication manager for `JWT` tokens and user sessions
#[derive(Clone)]
pub struct AuthManager {
    secret: Vec<u8>,
    token_expiry_hours: i64,
}

impl AuthManager {
    /// Create a new authentication manager
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>, token_expiry_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            token_expiry_hours,
        }
    }

    /// Generate an HS256 `JWT` token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails.
    pub fn generate_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.token_expiry_hours);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            aud: service_names::API_AUDIENCE.to_owned(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .context("Failed to encode JWT")?;

        Ok(token)
    }

    /// When generated tokens expire
    #[must_use]
    pub fn token_expiry(&self) -> DateTime<Utc> {
        Utc::now() + Duration::hours(self.token_expiry_hours)
    }

    /// Validate a token and return its claims
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] describing whether the token is
    /// expired, tampered with, or not a JWT at all.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[service_names::API_AUDIENCE]);

        match decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    Err(JwtValidationError::TokenExpired {
                        expired_at: self.read_expiry_unverified(token),
                    })
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::Base64(_)
                | jsonwebtoken::errors::ErrorKind::Json(_)
                | jsonwebtoken::errors::ErrorKind::Utf8(_) => {
                    Err(JwtValidationError::TokenMalformed {
                        details: e.to_string(),
                    })
                }
                _ => Err(JwtValidationError::TokenInvalid {
                    reason: e.to_string(),
                }),
            },
        }
    }

    /// Best-effort read of the `exp` claim from an expired token, for
    /// error reporting only. The signature already checked out (the
    /// rejection was `ExpiredSignature`), so decoding again without the
    /// expiry check is safe.
    fn read_expiry_unverified(&self, token: &str) -> Option<DateTime<Utc>> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;

        let data =
            decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation).ok()?;
        Utc.timestamp_opt(data.claims.exp, 0).single()
    }
}

/// Hash a password with bcrypt at the default cost
///
/// # Errors
///
/// Returns an error if bcrypt fails (effectively never for valid input).
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).context("Failed to hash password")
}

/// Verify a password against a stored bcrypt hash
///
/// # Errors
///
/// Returns an error if the stored hash is not valid bcrypt.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash).context("Failed to verify password")
}

/// Generate a random development JWT secret (64 hex chars)
#[must_use]
pub fn generate_jwt_secret() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}

/// Generate a password-reset token and the digest to store for it.
///
/// The plaintext token goes to the account owner once; only the SHA-256
/// digest is persisted.
#[must_use]
pub fn generate_reset_token() -> (String, String) {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(limits::RESET_TOKEN_LENGTH)
        .map(char::from)
        .collect();
    let digest = hash_reset_token(&token);
    (token, digest)
}

/// SHA-256 digest of a reset token, hex encoded
#[must_use]
pub fn hash_reset_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-time comparison of a presented token's digest against the
/// stored digest
#[must_use]
pub fn reset_token_matches(presented_token: &str, stored_digest: &str) -> bool {
    let presented_digest = hash_reset_token(presented_token);
    presented_digest
        .as_bytes()
        .ct_eq(stored_digest.as_bytes())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::new(
            "Test User".into(),
            "test@example.com".into(),
            "hashed_password_123".into(),
            UserRole::Consumer,
        )
    }

    fn test_manager() -> AuthManager {
        AuthManager::new(generate_jwt_secret(), 24)
    }

    #[test]
    fn generate_and_validate_token() {
        let manager = test_manager();
        let user = test_user();

        let token = manager.generate_token(&user).unwrap();
        assert!(!token.is_empty());

        let claims = manager.validate_token(&token).unwrap();
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.role, UserRole::Consumer);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn garbage_token_is_malformed() {
        let manager = test_manager();
        let err = manager.validate_token("not.a.jwt").unwrap_err();
        assert!(matches!(
            err,
            JwtValidationError::TokenMalformed { .. } | JwtValidationError::TokenInvalid { .. }
        ));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let manager_a = test_manager();
        let manager_b = test_manager();
        let token = manager_a.generate_token(&test_user()).unwrap();
        assert!(manager_b.validate_token(&token).is_err());
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let manager = AuthManager::new(generate_jwt_secret(), -1);
        let token = manager.generate_token(&test_user()).unwrap();
        let err = manager.validate_token(&token).unwrap_err();
        assert!(matches!(err, JwtValidationError::TokenExpired { .. }));
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn reset_token_digest_matches_only_original() {
        let (token, digest) = generate_reset_token();
        assert_eq!(token.len(), limits::RESET_TOKEN_LENGTH);
        assert!(reset_token_matches(&token, &digest));
        assert!(!reset_token_matches("someone-elses-token", &digest));
    }
}
