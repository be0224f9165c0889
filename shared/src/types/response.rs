//! API response types and wrappers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error envelope returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// HTTP status code
    pub status_code: u16,

    /// Time the error was produced
    pub timestamp: DateTime<Utc>,

    /// Request path
    pub path: String,

    /// Request method
    pub method: String,

    /// Human-readable error message
    pub message: String,

    /// Field-level validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ErrorResponse {
    /// Create a new error envelope
    pub fn new(
        status_code: u16,
        path: impl Into<String>,
        method: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status_code,
            timestamp: Utc::now(),
            path: path.into(),
            method: method.into(),
            message: message.into(),
            errors: None,
        }
    }

    /// Attach field-level validation errors
    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// Plain `{ "message": ... }` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status (`healthy` or `degraded`)
    pub status: String,

    /// Service name
    pub service: String,

    /// Service version
    pub version: String,

    /// Whether the database answered
    pub database: bool,

    /// Check timestamp
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn new(service: impl Into<String>, version: impl Into<String>, database: bool) -> Self {
        Self {
            status: if database { "healthy" } else { "degraded" }.to_string(),
            service: service.into(),
            version: version.into(),
            database,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_shape() {
        let body = serde_json::to_value(
            ErrorResponse::new(400, "/users", "POST", "Validation failed")
                .with_errors(vec!["email: must be a valid email".to_string()]),
        )
        .unwrap();

        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["path"], "/users");
        assert_eq!(body["method"], "POST");
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"][0], "email: must be a valid email");
        assert!(body["timestamp"].is_string());
    }

    #[test]
    fn test_error_response_omits_empty_errors() {
        let body = serde_json::to_value(ErrorResponse::new(404, "/x", "GET", "nope")).unwrap();
        assert!(body.get("errors").is_none());
    }

    #[test]
    fn test_health_status() {
        assert_eq!(HealthResponse::new("svc", "0.1.0", true).status, "healthy");
        assert_eq!(HealthResponse::new("svc", "0.1.0", false).status, "degraded");
    }
}
