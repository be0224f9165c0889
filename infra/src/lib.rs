//! # Infrastructure Layer
//!
//! Concrete implementations of the ports declared in `rv_core`:
//!
//! - **Database**: MySQL repositories using SQLx
//! - **Storage**: filesystem blob store
//! - **Matching**: HTTP client for the retina matching service

use thiserror::Error;

// Re-export core types for convenience
pub use rv_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Blob storage implementations
pub mod storage;

/// Retina matching service client
pub mod matching;

/// Backend wiring for the MySQL deployment
#[cfg(feature = "mysql")]
pub mod backend;

#[cfg(feature = "mysql")]
pub use backend::MySqlBackend;
#[cfg(feature = "mysql")]
pub use database::DatabasePool;
pub use matching::HttpMatchingGateway;
pub use storage::LocalBlobStorage;

/// Errors raised while setting up infrastructure
#[derive(Debug, Error)]
pub enum InfrastructureError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        DomainError::internal(error.to_string())
    }
}
