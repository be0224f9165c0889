use actix_web::HttpResponse;

use crate::middleware::CurrentUser;

/// Handler for GET /auth/me
pub async fn me(CurrentUser(user): CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(user)
}
