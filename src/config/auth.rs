//! Authentication configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Authentication configuration (session token verification).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthConfig {
    /// Shared HMAC secret the identity service signs session tokens with.
    pub jwt_secret: String,
}

impl AuthConfig {
    /// Validate authentication configuration.
    ///
    /// Production requires a secret of at least 32 bytes; development
    /// only requires one to be present.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.jwt_secret.is_empty() {
            return Err(ValidationError::MissingRequired("JWT_SECRET"));
        }
        if *environment == Environment::Production && self.jwt_secret.len() < 32 {
            return Err(ValidationError::JwtSecretTooShort);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_secret_is_rejected() {
        let config = AuthConfig::default();
        assert!(config.validate(&Environment::Development).is_err());
    }

    #[test]
    fn short_secret_fails_only_in_production() {
        let config = AuthConfig {
            jwt_secret: "short".to_string(),
        };
        assert!(config.validate(&Environment::Development).is_ok());
        assert!(matches!(
            config.validate(&Environment::Production),
            Err(ValidationError::JwtSecretTooShort)
        ));
    }
}
