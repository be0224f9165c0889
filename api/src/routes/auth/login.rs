use actix_web::{web, HttpResponse};
use validator::Validate;

use rv_core::Backend;

use crate::app::AppState;
use crate::dto::{AuthResponse, LoginRequest};
use crate::handlers::ApiResult;

/// Handler for POST /auth/login
///
/// # Response
///
/// ## Success (200 OK)
/// `{ "user": {...}, "tokens": { "accessToken": "...", "refreshToken": "..." } }`
///
/// ## Errors
/// - 400 Bad Request: Validation failed
/// - 401 Unauthorized: Invalid credentials
pub async fn login<B: Backend>(
    state: web::Data<AppState<B>>,
    request: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;

    let session = state
        .services
        .auth
        .login(&request.email, &request.password)
        .await
        .map_err(|e| {
            tracing::info!(email = %request.email, error = %e, "Login failed");
            e
        })?;

    Ok(HttpResponse::Ok().json(AuthResponse::from(session)))
}
