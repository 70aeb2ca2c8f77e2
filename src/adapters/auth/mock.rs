//! Mock session validator for testing.
//!
//! Implements the `SessionValidator` port over an in-memory token map,
//! avoiding real token signing in handler and middleware tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Mock session validator.
///
/// Stores a map of tokens to users. Tokens not in the map return
/// `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Optional error returned for every validation, for error-path tests.
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.tokens.write().unwrap().insert(token.into(), user);
        self
    }

    /// Adds a valid token for a fresh user id with the given name.
    pub fn with_named_user(self, token: impl Into<String>, name: &str) -> (Self, UserId) {
        let id = UserId::new();
        (
            self.with_user(token, AuthenticatedUser::new(id, name)),
            id,
        )
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Registers a new valid token at runtime.
    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens.write().unwrap().insert(token.into(), user);
    }

    /// Removes a token, making it invalid.
    pub fn remove_token(&self, token: &str) {
        self.tokens.write().unwrap().remove(token);
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
