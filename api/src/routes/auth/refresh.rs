use actix_web::{web, HttpResponse};

use rv_core::Backend;

use crate::app::AppState;
use crate::handlers::ApiResult;
use crate::middleware::RefreshContext;

/// Handler for POST /auth/refresh
///
/// Rotates the presented refresh token (Bearer header) into a new pair.
///
/// ## Errors
/// - 401 Unauthorized: Invalid refresh token, refresh token expired or user not found
pub async fn refresh<B: Backend>(
    state: web::Data<AppState<B>>,
    context: RefreshContext,
) -> ApiResult<HttpResponse> {
    let tokens = state
        .services
        .auth
        .refresh(context.user_id, &context.refresh_token)
        .await?;

    Ok(HttpResponse::Ok().json(tokens))
}
