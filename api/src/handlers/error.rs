//! Mapping of domain and request errors onto the JSON error envelope
//!
//! Every failing request is answered with
//! `{statusCode, timestamp, path, method, message, errors?}`. Handlers and
//! middleware return [`ApiError`]; the [`ErrorEnvelope`](crate::middleware::ErrorEnvelope)
//! middleware stamps the request path and method on the rendered body.

use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse, ResponseError,
};
use thiserror::Error;

use rv_core::errors::{AuthError, DomainError, TokenError};
use rv_shared::types::ErrorResponse;

/// Message sent for every internal failure
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Error returned by handlers and middleware
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    /// Internal failure with a message safe to show to clients
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Client-facing message
    pub fn message(&self) -> String {
        match self {
            ApiError::Domain(DomainError::Internal { .. }) => INTERNAL_ERROR_MESSAGE.to_string(),
            ApiError::Domain(DomainError::Token(TokenError::TokenGenerationFailed)) => {
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }

    /// Field-level details for validation failures
    pub fn details(&self) -> Option<Vec<String>> {
        match self {
            ApiError::Validation(errors) => Some(errors.clone()),
            _ => None,
        }
    }

    /// Render and log the envelope for a request
    pub fn render(&self, path: &str, method: &str) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), path, method, error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), path, method, message = %self.message(), "Request rejected");
        }
        self.build(path, method)
    }

    fn build(&self, path: &str, method: &str) -> HttpResponse {
        let status = self.status_code();
        let mut body = ErrorResponse::new(status.as_u16(), path, method, self.message());
        if let Some(errors) = self.details() {
            body = body.with_errors(errors);
        }
        HttpResponse::build(status).json(body)
    }
}

fn domain_status(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation { .. } | DomainError::ValidationErr(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict { .. } => StatusCode::CONFLICT,
        DomainError::Forbidden { .. } => StatusCode::FORBIDDEN,
        DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Auth(auth) => match auth {
            AuthError::EmailAlreadyExists => StatusCode::CONFLICT,
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::UserNotFound
            | AuthError::InvalidCallbackKey => StatusCode::UNAUTHORIZED,
        },
        DomainError::Token(TokenError::TokenGenerationFailed) => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Token(_) => StatusCode::UNAUTHORIZED,
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Domain(error) => domain_status(error),
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Envelope without request context; `ErrorEnvelope` replaces it
    fn error_response(&self) -> HttpResponse {
        self.build("", "")
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, failures)| {
                failures.iter().map(move |failure| {
                    let reason = failure
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| failure.code.to_string());
                    format!("{}: {}", field, reason)
                })
            })
            .collect();
        messages.sort();
        ApiError::Validation(messages)
    }
}

/// Error handler for malformed JSON bodies
pub fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let api_error = match &error {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            ApiError::PayloadTooLarge("Request body too large".to_string())
        }
        _ => ApiError::BadRequest(error.to_string()),
    };
    api_error.into()
}

/// Error handler for malformed query strings
pub fn query_error_handler(error: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(error.to_string()).into()
}

/// Error handler for malformed path segments (e.g. ids that are not UUIDs)
pub fn path_error_handler(error: PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(error.to_string()).into()
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Fallback for unknown routes
pub async fn not_found(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(ApiError::NotFound(format!(
        "Cannot {} {}",
        req.method(),
        req.path()
    )))
}
