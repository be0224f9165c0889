//! Authentication and authorization configuration

use serde::{Deserialize, Serialize};

const DEFAULT_ACCESS_SECRET: &str = "access-secret-change-in-production";
const DEFAULT_REFRESH_SECRET: &str = "refresh-secret-change-in-production";

/// Authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT settings
    #[serde(default)]
    pub jwt: JwtConfig,
}

/// JWT authentication configuration
///
/// Expirations use the `<n>s|m|h|d` notation (e.g. `15m`, `7d`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Secret for signing access tokens
    pub access_secret: String,

    /// Access token lifetime
    pub access_expiration: String,

    /// Secret for signing refresh tokens
    pub refresh_secret: String,

    /// Refresh token lifetime
    pub refresh_expiration: String,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            access_secret: String::from(DEFAULT_ACCESS_SECRET),
            access_expiration: String::from("15m"),
            refresh_secret: String::from(DEFAULT_REFRESH_SECRET),
            refresh_expiration: String::from("7d"),
            issuer: String::from("retina-verify"),
            audience: String::from("retina-verify-api"),
        }
    }
}

impl JwtConfig {
    /// Create a configuration with explicit secrets
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            ..Default::default()
        }
    }

    /// Check if using a default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.access_secret == DEFAULT_ACCESS_SECRET || self.refresh_secret == DEFAULT_REFRESH_SECRET
    }
}
