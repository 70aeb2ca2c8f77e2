//! Session validation port.
//!
//! Provider-agnostic token validation. The HTTP middleware uses this to
//! turn a Bearer token into an authenticated identity; the engine never
//! issues tokens itself.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts user identity.
///
/// Implementations must return `AuthError::InvalidToken` for malformed or
/// badly-signed tokens and `AuthError::TokenExpired` for expired ones.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
