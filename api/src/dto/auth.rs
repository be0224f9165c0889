use serde::{Deserialize, Serialize};
use validator::Validate;

use rv_core::domain::{TokenPair, User};
use rv_core::services::{AuthSession, Registration};

use super::common::validate_password_strength;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "firstName should not be empty"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "lastName should not be empty"))]
    pub last_name: String,

    #[validate(email(message = "email must be an email"))]
    pub email: String,

    #[validate(
        length(min = 8, message = "password must be longer than or equal to 8 characters"),
        custom = "validate_password_strength"
    )]
    pub password: String,
}

impl From<RegisterRequest> for Registration {
    fn from(request: RegisterRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password: request.password,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email must be an email"))]
    pub email: String,

    #[validate(length(min = 1, message = "password should not be empty"))]
    pub password: String,
}

/// `{user, tokens}` returned by login and registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub tokens: TokenPair,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user: session.user,
            tokens: session.tokens,
        }
    }
}

/// Reply of `POST /auth/logout-all`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutAllResponse {
    pub message: String,
    pub count: u64,
}
