//! Authentication types for the domain layer.
//!
//! These represent an authenticated identity extracted from a validated
//! token. The engine does not issue tokens; any provider can populate these
//! via the `SessionValidator` port.

use super::UserId;
use thiserror::Error;

/// Authenticated user extracted from a validated token.
///
/// Contains only the claims the engine actually uses: the identity the
/// requester acts as, plus a display name for `interest` notifications.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the auth provider.
    pub id: UserId,

    /// Display name from the token claims.
    pub display_name: String,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

/// Errors from token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is invalid")]
    InvalidToken,

    #[error("Authentication service unavailable: {0}")]
    ServiceUnavailable(String),
}
