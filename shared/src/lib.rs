//! Shared utilities and common types for the RetinaVerify server
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types and layered loading
//! - Response envelopes and pagination types

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    LogFormat, LoggingConfig, MatchingConfig, ServerConfig, StorageConfig,
};
pub use types::{ErrorResponse, HealthResponse, PageMeta, Pagination};
