//! Configuration for the token service

use chrono::Duration;
use rv_shared::config::JwtConfig;

use crate::errors::ValidationError;

/// Lifetime used when no expiration string is configured
pub const DEFAULT_EXPIRATION: &str = "30m";

/// Longest accepted lifetime (100 years); keeps `now + lifetime` representable
const MAX_EXPIRATION_SECONDS: i64 = 100 * 365 * 86_400;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Secret signing access tokens
    pub access_secret: String,
    /// Secret signing refresh tokens
    pub refresh_secret: String,
    pub access_lifetime: Duration,
    pub refresh_lifetime: Duration,
    pub issuer: String,
    pub audience: String,
}

impl TokenServiceConfig {
    /// Builds the service configuration, parsing both expiration strings
    pub fn from_jwt_config(jwt: &JwtConfig) -> Result<Self, ValidationError> {
        Ok(Self {
            access_secret: jwt.access_secret.clone(),
            refresh_secret: jwt.refresh_secret.clone(),
            access_lifetime: parse_expiration(Some(&jwt.access_expiration))?,
            refresh_lifetime: parse_expiration(Some(&jwt.refresh_expiration))?,
            issuer: jwt.issuer.clone(),
            audience: jwt.audience.clone(),
        })
    }
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            access_secret: "development-access-secret".to_string(),
            refresh_secret: "development-refresh-secret".to_string(),
            access_lifetime: Duration::minutes(15),
            refresh_lifetime: Duration::days(7),
            issuer: "retina-verify".to_string(),
            audience: "retina-verify-api".to_string(),
        }
    }
}

/// Parses an expiration such as `15m`, `7d`, `3600s` or `12h`
///
/// A missing or blank value means [`DEFAULT_EXPIRATION`].
pub fn parse_expiration(value: Option<&str>) -> Result<Duration, ValidationError> {
    let value = match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => DEFAULT_EXPIRATION,
    };

    let split = value.len() - value.chars().last().map_or(0, char::len_utf8);
    let (amount, unit) = value.split_at(split);
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidExpirationFormat);
    }
    let amount: i64 = amount
        .parse()
        .map_err(|_| ValidationError::InvalidExpirationFormat)?;

    let unit_seconds: i64 = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 3_600,
        "d" => 86_400,
        _ => return Err(ValidationError::InvalidExpirationFormat),
    };

    amount
        .checked_mul(unit_seconds)
        .filter(|secs| *secs <= MAX_EXPIRATION_SECONDS)
        .map(Duration::seconds)
        .ok_or(ValidationError::InvalidExpirationFormat)
}
