//! JWT issuing and refresh token bookkeeping.

pub mod config;
pub mod service;

pub use config::{parse_expiration, TokenServiceConfig, DEFAULT_EXPIRATION};
pub use service::TokenService;
