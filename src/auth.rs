// ABOUTME: JWT-based user authentication and password hashing
// ABOUTME: Issues, validates, and renews HS256 tokens and wraps bcrypt on the blocking pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Authentication
//!
//! Tokens are HS256 JWTs whose subject is the user's email. The same token is
//! sent in the `Authorization` header and in the `token` cookie; the auth
//! filter compares the two.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use workout_diary_core::errors::{AppError, AppResult};
use workout_diary_core::models::User;

/// `JWT` validation error with detailed information
#[derive(Debug, Clone, Error)]
pub enum JwtValidationError {
    /// Token has expired
    #[error("JWT token expired at {}", expired_at.format("%Y-%m-%d %H:%M:%S UTC"))]
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
    /// Token signature is invalid
    #[error("JWT token signature is invalid: {reason}")]
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper `JWT` format)
    #[error("JWT token is malformed: {details}")]
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl From<JwtValidationError> for AppError {
    fn from(error: JwtValidationError) -> Self {
        match &error {
            JwtValidationError::TokenExpired { .. } => {
                Self::auth_expired().with_details(serde_json::json!({ "reason": error.to_string() }))
            }
            _ => Self::auth_invalid(error.to_string()),
        }
    }
}

/// `JWT` claims for user authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User email
    pub sub: String,
    /// Username
    pub username: String,
    /// `ROLE_*` names at issue time
    pub roles: Vec<String>,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

impl Claims {
    /// Expiry as a timestamp
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Authentication manager for `JWT` tokens
#[derive(Clone)]
pub struct AuthManager {
    jwt_secret: Vec<u8>,
    token_expiry: Duration,
    renewal_window: Duration,
}

impl AuthManager {
    /// Create a new authentication manager
    #[must_use]
    pub fn new(jwt_secret: Vec<u8>, expiry_minutes: i64, renewal_window_minutes: i64) -> Self {
        Self {
            jwt_secret,
            token_expiry: Duration::minutes(expiry_minutes),
            renewal_window: Duration::minutes(renewal_window_minutes),
        }
    }

    /// Token lifetime in seconds
    #[must_use]
    pub fn expiry_seconds(&self) -> i64 {
        self.token_expiry.num_seconds()
    }

    /// Generate a `JWT` for a user
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails
    pub fn generate_token(&self, user: &User) -> AppResult<String> {
        let roles = user
            .roles
            .iter()
            .map(|role| role.name.clone())
            .collect();
        self.issue(user.email.clone(), user.name.clone(), roles)
    }

    fn issue(&self, email: String, username: String, roles: Vec<String>) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: email,
            username,
            roles,
            iat: now.timestamp(),
            exp: (now + self.token_expiry).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.jwt_secret),
        )
        .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
    }

    /// Validate a token and return its claims
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] if the token is malformed, badly
    /// signed, or expired
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let claims = self.decode_claims(token)?;
        let expired_at = claims.expires_at();
        if Utc::now() >= expired_at {
            tracing::debug!("JWT token expired for user: {}", claims.sub);
            return Err(JwtValidationError::TokenExpired { expired_at });
        }
        Ok(claims)
    }

    /// Email of a correctly signed token, ignoring expiry
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] if the token is malformed or badly signed
    pub fn decipher_email(&self, token: &str) -> Result<String, JwtValidationError> {
        self.decode_claims(token).map(|claims| claims.sub)
    }

    /// Whether the remaining lifetime is within the renewal window
    #[must_use]
    pub fn is_close_to_expiry(&self, claims: &Claims) -> bool {
        claims.expires_at() - Utc::now() <= self.renewal_window
    }

    /// Issue a fresh token for the same subject
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails
    pub fn renew_token(&self, claims: &Claims) -> AppResult<String> {
        self.issue(
            claims.sub.clone(),
            claims.username.clone(),
            claims.roles.clone(),
        )
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.jwt_secret),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| Self::convert_jwt_error(&e))
    }

    /// Convert JWT library errors to detailed validation errors
    fn convert_jwt_error(e: &jsonwebtoken::errors::Error) -> JwtValidationError {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".into(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "Token format is invalid".into(),
            },
            ErrorKind::Base64(base64_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid base64: {base64_err}"),
            },
            ErrorKind::Json(json_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid JSON: {json_err}"),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }
}

/// Hash a password with bcrypt on the current thread
///
/// # Errors
///
/// Returns an error if bcrypt fails
pub fn hash_password_blocking(password: &str, cost: u32) -> AppResult<String> {
    bcrypt::hash(password, cost)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

/// Hash a password on the blocking pool
///
/// # Errors
///
/// Returns an error if bcrypt fails or the blocking task panics
pub async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    tokio::task::spawn_blocking(move || hash_password_blocking(&password, cost))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
}

/// Check a password against a bcrypt hash on the blocking pool
///
/// # Errors
///
/// Returns an error if the blocking task panics
pub async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(&password, &hash).unwrap_or(false))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))
}

/// Minimal email shape check
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.len() > 2
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

/// Password length rule
#[must_use]
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= 6
}
