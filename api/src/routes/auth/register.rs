use actix_web::{web, HttpResponse};
use validator::Validate;

use rv_core::Backend;

use crate::app::AppState;
use crate::dto::{AuthResponse, RegisterRequest};
use crate::handlers::ApiResult;

/// Handler for POST /auth/register
///
/// Creates a `VALIDATOR` account and signs it in.
///
/// # Request Body
///
/// ```json
/// {
///     "firstName": "Ada",
///     "lastName": "Lovelace",
///     "email": "ada@example.com",
///     "password": "Secret1!"
/// }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// `{ "user": {...}, "tokens": { "accessToken": "...", "refreshToken": "..." } }`
///
/// ## Errors
/// - 400 Bad Request: Validation failed
/// - 409 Conflict: Email already exists
pub async fn register<B: Backend>(
    state: web::Data<AppState<B>>,
    request: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;

    let session = state
        .services
        .auth
        .register(request.into_inner().into())
        .await?;

    Ok(HttpResponse::Created().json(AuthResponse::from(session)))
}
