//! JWT adapter for session validation.
//!
//! Implements the `SessionValidator` port against HS256 tokens signed with
//! a shared secret by the identity service. Validation checks the
//! signature and expiry, then maps claims to the domain
//! `AuthenticatedUser` type.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Configuration for the JWT adapter.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret the identity service signs tokens with.
    pub secret: String,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

/// Claims carried by session tokens.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    /// Subject, the user's UUID.
    sub: String,

    /// Expiry timestamp (Unix epoch seconds).
    exp: i64,

    /// Display name, surfaced in interest notifications.
    #[serde(default)]
    name: Option<String>,
}

/// Validates HS256 session tokens.
pub struct JwtSessionValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // No audience claim on session tokens.
        validation.validate_aud = false;

        Self {
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => {
                        tracing::debug!("JWT validation failed: {}", e);
                        AuthError::InvalidToken
                    }
                }
            },
        )?;

        let id: UserId = data.claims.sub.parse().map_err(|_| {
            tracing::debug!("JWT subject is not a user id");
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(
            id,
            data.claims.name.unwrap_or_default(),
        ))
    }
}
