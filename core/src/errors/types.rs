//! Error types for authentication, token management and input validation
//!
//! The `Display` text of each variant is the message sent to clients, so it
//! must stay free of internal details.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    MissingToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Invalid callback key")]
    InvalidCallbackKey,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    RequiredField { field: String },

    #[error("{field} has an invalid format")]
    InvalidFormat { field: String },

    #[error("Invalid expiration time format")]
    InvalidExpirationFormat,

    #[error("startDate must not be after endDate")]
    InvalidDateRange,

    #[error("Date range must not exceed {max_days} days")]
    DateRangeTooLong { max_days: i64 },

    #[error("Password must contain at least one uppercase letter, one lowercase letter, one number, and one special character")]
    WeakPassword,
}
