//! Validation statistics

use actix_web::{web, HttpResponse};

use rv_core::{Backend, UserRole};

use crate::app::AppState;
use crate::dto::{DailyStatisticsQuery, TotalStatisticsQuery};
use crate::handlers::ApiResult;
use crate::middleware::{CurrentUser, JwtAuth};

pub fn configure<B: Backend>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/statistics")
            .wrap(JwtAuth::access().roles([UserRole::SuperAdmin, UserRole::OrgAdmin]))
            .route("/daily", web::get().to(daily::<B>))
            .route("/total", web::get().to(total::<B>)),
    );
}

/// Handler for GET /statistics/daily?organizationId=&employeeId=&startDate=&endDate=
pub async fn daily<B: Backend>(
    state: web::Data<AppState<B>>,
    CurrentUser(actor): CurrentUser,
    query: web::Query<DailyStatisticsQuery>,
) -> ApiResult<HttpResponse> {
    let range = query.range()?;
    let statistics = state
        .services
        .statistics
        .daily(&actor, query.organization_id, query.employee_id, range)
        .await?;
    Ok(HttpResponse::Ok().json(statistics))
}

/// Handler for GET /statistics/total?organizationId=
pub async fn total<B: Backend>(
    state: web::Data<AppState<B>>,
    CurrentUser(actor): CurrentUser,
    query: web::Query<TotalStatisticsQuery>,
) -> ApiResult<HttpResponse> {
    let statistics = state
        .services
        .statistics
        .total(&actor, query.organization_id)
        .await?;
    Ok(HttpResponse::Ok().json(statistics))
}
