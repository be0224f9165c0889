use actix_web::{web, HttpResponse};

use rv_core::Backend;
use rv_shared::types::MessageResponse;

use crate::app::AppState;
use crate::dto::LogoutAllResponse;
use crate::handlers::ApiResult;
use crate::middleware::{CurrentUser, RefreshContext};

/// Handler for POST /auth/logout
///
/// Revokes the refresh token from the Bearer header. Unknown tokens are
/// accepted silently.
pub async fn logout<B: Backend>(
    state: web::Data<AppState<B>>,
    context: RefreshContext,
) -> ApiResult<HttpResponse> {
    state
        .services
        .auth
        .logout(context.user_id, &context.refresh_token)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Logout successful")))
}

/// Handler for POST /auth/logout-all
pub async fn logout_all<B: Backend>(
    state: web::Data<AppState<B>>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<HttpResponse> {
    let count = state.services.auth.logout_all(user.id).await?;

    Ok(HttpResponse::Ok().json(LogoutAllResponse {
        message: "Logged out from all devices".to_string(),
        count,
    }))
}
