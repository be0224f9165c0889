use actix_web::{web, HttpResponse};

use rv_core::Backend;
use rv_shared::HealthResponse;

use crate::app::AppState;

pub fn configure<B: Backend>(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check::<B>));
}

/// Handler for GET /health
pub async fn health_check<B: Backend>(state: web::Data<AppState<B>>) -> HttpResponse {
    let database = match &state.database {
        Some(pool) => pool.health_check().await,
        None => true,
    };

    HttpResponse::Ok().json(HealthResponse::new(
        "retina-verify-api",
        env!("CARGO_PKG_VERSION"),
        database,
    ))
}
