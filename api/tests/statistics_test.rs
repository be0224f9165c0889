//! Integration tests for the statistics endpoints

mod common;

use actix_web::{http::StatusCode, test};
use chrono::{Duration, Utc};
use serde_json::Value;
use uuid::Uuid;

use rv_api::create_app;
use rv_core::{UserRole, ValidationRecord, ValidationStatisticsRepository};

use common::{bearer, TestContext};

async fn record(ctx: &TestContext, organization_id: Uuid, successes: usize, failures: usize) {
    for _ in 0..successes {
        ctx.components
            .statistics
            .record(ValidationRecord::successful(organization_id, Uuid::new_v4(), 0.9))
            .await
            .unwrap();
    }
    for _ in 0..failures {
        ctx.components
            .statistics
            .record(ValidationRecord::failed(organization_id))
            .await
            .unwrap();
    }
}

#[actix_web::test]
async fn test_daily_statistics_fill_every_day() {
    let ctx = TestContext::new();
    let organization = ctx.organization("Acme").await;
    record(&ctx, organization.id, 2, 1).await;
    let token = ctx.super_admin().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let today = Utc::now().date_naive();
    let start = today - Duration::days(2);
    let req = test::TestRequest::get()
        .uri(&format!(
            "/statistics/daily?organizationId={}&startDate={}&endDate={}",
            organization.id, start, today
        ))
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["organizationId"], organization.id.to_string());
    let days = body["dailyStats"].as_array().unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(days[0]["date"], start.to_string());
    assert_eq!(days[0]["successCount"], 0);
    assert_eq!(days[2]["date"], today.to_string());
    assert_eq!(days[2]["successCount"], 2);
    assert_eq!(days[2]["failureCount"], 1);
}

#[actix_web::test]
async fn test_daily_statistics_reject_inverted_range() {
    let ctx = TestContext::new();
    let token = ctx.super_admin().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/statistics/daily?startDate=2024-03-10&endDate=2024-03-01")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/statistics/daily?startDate=2024-03-01")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_total_statistics_scoped_to_org_admin() {
    let ctx = TestContext::new();
    let own = ctx.organization("Own").await;
    let other = ctx.organization("Other").await;
    record(&ctx, own.id, 2, 1).await;
    record(&ctx, other.id, 5, 0).await;
    let (_, token) = ctx.user("oa@example.com", UserRole::OrgAdmin, Some(own.id)).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/statistics/total")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["organizationId"], own.id.to_string());
    assert_eq!(body["totalSuccessCount"], 2);
    assert_eq!(body["totalFailureCount"], 1);
    assert_eq!(body["totalCount"], 3);
    assert_eq!(body["successRate"], 66.67);

    let req = test::TestRequest::get()
        .uri(&format!("/statistics/total?organizationId={}", other.id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_total_statistics_across_organizations() {
    let ctx = TestContext::new();
    let token = ctx.super_admin().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/statistics/total")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["organizationId"].is_null());
    assert_eq!(body["totalCount"], 0);
    assert_eq!(body["successRate"], 0.0);
}

#[actix_web::test]
async fn test_validators_cannot_read_statistics() {
    let ctx = TestContext::new();
    let (_, token) = ctx.user("val@example.com", UserRole::Validator, None).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/statistics/total")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
