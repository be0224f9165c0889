//! Integration tests for the user administration endpoints

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use uuid::Uuid;

use rv_api::create_app;
use rv_core::UserRole;

use common::{bearer, TestContext};

#[actix_web::test]
async fn test_users_require_super_admin() {
    let ctx = TestContext::new();
    let (_, token) = ctx.user("val@example.com", UserRole::Validator, None).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/users")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Insufficient permissions");
}

#[actix_web::test]
async fn test_user_lifecycle() {
    let ctx = TestContext::new();
    let token = ctx.super_admin().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/users")
        .insert_header(bearer(&token))
        .set_json(json!({
            "firstName": "Grace",
            "lastName": "Hopper",
            "email": "grace@example.com",
            "password": "longenough"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["role"], "VALIDATOR");
    let id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/users/email/find?email=grace@example.com")
        .insert_header(bearer(&token))
        .to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found["id"], id);

    let req = test::TestRequest::put()
        .uri(&format!("/users/{}", id))
        .insert_header(bearer(&token))
        .set_json(json!({ "lastName": "Murray Hopper", "role": "ORG_ADMIN" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["lastName"], "Murray Hopper");
    assert_eq!(updated["role"], "ORG_ADMIN");

    let req = test::TestRequest::delete()
        .uri(&format!("/users/{}", id))
        .insert_header(bearer(&token))
        .to_request();
    let deleted: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(deleted["email"], "grace@example.com");

    let req = test::TestRequest::get()
        .uri(&format!("/users/{}", id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], format!("User with ID {} not found", id));
}

#[actix_web::test]
async fn test_list_users_paginates_and_filters() {
    let ctx = TestContext::new();
    let token = ctx.super_admin().await;
    for i in 0..3 {
        ctx.user(&format!("v{}@example.com", i), UserRole::Validator, None).await;
    }
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/users?page=2&limit=2&role=VALIDATOR")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["users"].as_array().unwrap().len(), 1);
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["page"], 2);
    assert_eq!(body["meta"]["totalPages"], 2);

    let req = test::TestRequest::get()
        .uri("/users?limit=500")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_update_to_taken_email_conflicts() {
    let ctx = TestContext::new();
    let token = ctx.super_admin().await;
    let (first, _) = ctx.user("one@example.com", UserRole::Validator, None).await;
    ctx.user("two@example.com", UserRole::Validator, None).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::put()
        .uri(&format!("/users/{}", first.id))
        .insert_header(bearer(&token))
        .set_json(json!({ "email": "two@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::put()
        .uri(&format!("/users/{}", Uuid::new_v4()))
        .insert_header(bearer(&token))
        .set_json(json!({ "firstName": "Nobody" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_find_by_unknown_email() {
    let ctx = TestContext::new();
    let token = ctx.super_admin().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/users/email/find?email=ghost@example.com")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User with email ghost@example.com not found");
}
