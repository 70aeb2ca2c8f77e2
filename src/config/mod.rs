//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `SPOTTR_` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use spottr_engine::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! let addr = config.server.socket_addr().expect("Invalid bind address");
//! println!("Server running on {}", addr);
//! ```

mod auth;
mod database;
mod error;
mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Authentication configuration (session token secret)
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads a `.env` file if present, then reads environment variables
    /// with the `SPOTTR` prefix, `__` separating nested values:
    ///
    /// - `SPOTTR__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `SPOTTR__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SPOTTR")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        Ok(())
    }

    /// Check if running in production environment.
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: "postgres://localhost/spottr".to_string(),
                ..Default::default()
            },
            auth: AuthConfig {
                jwt_secret: "a-secret-long-enough-for-hs256-use".to_string(),
            },
        }
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn missing_database_url_fails_validation() {
        let mut config = test_config();
        config.database.url = String::new();
        assert!(config.validate().is_err());
    }
}
