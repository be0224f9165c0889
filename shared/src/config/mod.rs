//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - JWT secrets and lifetimes
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `matching` - External retina matching service
//! - `server` - HTTP server and CORS configuration
//! - `storage` - Blob storage location
//!
//! [`AppConfig::load`] layers built-in defaults, optional TOML files,
//! `APP_`-prefixed variables and the conventional flat variables
//! (`PORT`, `JWT_ACCESS_SECRET`, ...), in that order.

pub mod auth;
pub mod database;
pub mod environment;
pub mod matching;
pub mod server;
pub mod storage;

use config::{Config, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::{AuthConfig, JwtConfig};
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use matching::MatchingConfig;
pub use server::{CorsConfig, ServerConfig};
pub use storage::StorageConfig;

/// Errors raised while assembling the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Flat environment variables mapped onto configuration keys
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("HOST", "server.host"),
    ("PORT", "server.port"),
    ("DATABASE_URL", "database.url"),
    ("JWT_ACCESS_SECRET", "auth.jwt.access_secret"),
    ("JWT_ACCESS_EXPIRATION", "auth.jwt.access_expiration"),
    ("JWT_REFRESH_SECRET", "auth.jwt.refresh_secret"),
    ("JWT_REFRESH_EXPIRATION", "auth.jwt.refresh_expiration"),
    ("STORAGE_ROOT", "storage.root"),
    ("STORAGE_CONTAINER_NAME", "storage.container"),
    ("STORAGE_PUBLIC_URL", "storage.public_base_url"),
    ("MATCHING_SERVICE_URL", "matching.base_url"),
    ("MATCHING_CALLBACK_KEY", "matching.callback_key"),
    ("MATCHING_INSTANCE_ID", "matching.instance_id"),
    ("VALIDATION_TIMEOUT_MS", "matching.validation_timeout_ms"),
];

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Blob storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Matching service configuration
    #[serde(default)]
    pub matching: MatchingConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Built-in defaults for an environment
    pub fn for_environment(environment: Environment) -> Self {
        let cors = if environment.is_development() {
            CorsConfig::development()
        } else {
            CorsConfig::default()
        };

        Self {
            environment,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            storage: StorageConfig::default(),
            matching: MatchingConfig::default(),
            cors,
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Load the layered configuration for the current process
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let environment = Environment::from_env();
        let defaults = Config::try_from(&Self::for_environment(environment))?;

        let mut builder = Config::builder()
            .add_source(defaults)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(environment.config_file()).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        for (variable, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(variable).ok())?;
        }

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that must never reach production
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment.is_production() && self.auth.jwt.is_using_default_secret() {
            return Err(ConfigError::Invalid(
                "JWT secrets must be configured in production".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must not be 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_defaults() {
        let config = AppConfig::for_environment(Environment::Development);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.container, "retinas");
        assert_eq!(config.matching.validation_timeout_ms, 30_000);
        assert!(config.cors.allows_any_origin());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_rejects_default_secrets() {
        let mut config = AppConfig::for_environment(Environment::Production);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.auth.jwt = JwtConfig::new("access", "refresh");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_round_trip_through_config_source() {
        let defaults = AppConfig::for_environment(Environment::Staging);
        let loaded: AppConfig = Config::builder()
            .add_source(Config::try_from(&defaults).unwrap())
            .set_override("server.port", 4000)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(loaded.environment, Environment::Staging);
        assert_eq!(loaded.server.port, 4000);
        assert_eq!(loaded.auth.jwt.issuer, "retina-verify");
    }
}
