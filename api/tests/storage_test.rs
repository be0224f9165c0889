//! Integration tests for image storage and retina enrolment

mod common;

use actix_web::{http::header, http::StatusCode, test};
use serde_json::{json, Value};

use rv_api::create_app;
use rv_api::middleware::CALLBACK_KEY_HEADER;
use rv_core::{RetinaImageRepository, UserRole};

use common::{bearer, multipart_post, TestContext, CALLBACK_KEY};

const IMAGE: &[u8] = b"\xFF\xD8\xFFfake-jpeg";

#[actix_web::test]
async fn test_retina_lifecycle() {
    let ctx = TestContext::new();
    let organization = ctx.organization("Acme").await;
    let employee = ctx.employee(organization.id).await;
    let (_, token) = ctx.user("oa@example.com", UserRole::OrgAdmin, Some(organization.id)).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;
    let base = format!(
        "/storage/organizations/{}/employees/{}/retinas",
        organization.id, employee.id
    );

    let req = multipart_post(&base, &token, Some(("eye.jpg", IMAGE)), &[]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let retina_id = body["id"].as_str().unwrap().to_string();
    assert!(body["url"].as_str().unwrap().ends_with(&format!("{}.jpg", retina_id)));

    // Queued for template extraction
    let commands = ctx.components.matcher.image_commands().await;
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].img_id.to_string(), retina_id);
    assert_eq!(commands[0].employee_id, employee.id);

    let req = test::TestRequest::get()
        .uri(&base)
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body[0]["id"], retina_id);
    assert!(body[0]["createdAt"].is_string());

    let req = test::TestRequest::get()
        .uri(&format!("{}/{}", base, retina_id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/jpeg");
    assert_eq!(test::read_body(resp).await.as_ref(), IMAGE);

    let req = test::TestRequest::delete()
        .uri(&format!("{}/{}", base, retina_id))
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Retina photo deleted successfully");
    assert!(ctx.components.blobs.paths().await.is_empty());

    let req = test::TestRequest::get()
        .uri(&base)
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "No retina photos found for this employee");
}

#[actix_web::test]
async fn test_retina_upload_checks() {
    let ctx = TestContext::new();
    let own = ctx.organization("Own").await;
    let other = ctx.organization("Other").await;
    let employee = ctx.employee(own.id).await;
    let (_, token) = ctx.user("oa@example.com", UserRole::OrgAdmin, Some(own.id)).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = multipart_post(
        &format!("/storage/organizations/{}/employees/{}/retinas", own.id, employee.id),
        &token,
        None,
        &[],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "No file uploaded");

    let req = multipart_post(
        &format!("/storage/organizations/{}/employees/{}/retinas", other.id, employee.id),
        &token,
        Some(("eye.jpg", IMAGE)),
        &[],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["message"],
        "You do not have permission to access resources for this organization"
    );

    let (_, validator) = ctx.user("val@example.com", UserRole::Validator, Some(own.id)).await;
    let req = multipart_post("/storage/upload", &validator, Some(("eye.jpg", IMAGE)), &[]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_upload_and_fetch_image() {
    let ctx = TestContext::new();
    let token = ctx.super_admin().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = multipart_post("/storage/upload", &token, Some(("scan.png", IMAGE)), &[]).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["url"].as_str().unwrap().ends_with(".png"));

    let path = ctx.components.blobs.paths().await.remove(0);
    assert!(path.starts_with("uploads/"));

    let req = test::TestRequest::get()
        .uri(&format!("/storage/images/{}", path))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");

    let req = test::TestRequest::get()
        .uri("/storage/images/uploads/missing.png")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Image not found");
}

#[actix_web::test]
async fn test_analysis_callback_sets_document_once() {
    let ctx = TestContext::new();
    let organization = ctx.organization("Acme").await;
    let employee = ctx.employee(organization.id).await;
    let token = ctx.super_admin().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = multipart_post(
        &format!("/storage/organizations/{}/employees/{}/retinas", organization.id, employee.id),
        &token,
        Some(("eye.jpg", IMAGE)),
        &[],
    )
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let retina_id = body["id"].as_str().unwrap().to_string();

    let callback = |document: &str| {
        test::TestRequest::post()
            .uri("/storage/analysis-callback")
            .insert_header((CALLBACK_KEY_HEADER, CALLBACK_KEY))
            .set_json(json!({
                "status": "success",
                "id": document,
                "employeeId": employee.id,
                "imgId": retina_id,
            }))
            .to_request()
    };

    let body: Value = test::call_and_read_body_json(&app, callback("doc-1")).await;
    assert_eq!(body["processed"], true);
    let body: Value = test::call_and_read_body_json(&app, callback("doc-2")).await;
    assert_eq!(body["processed"], false);

    let retinas = ctx
        .components
        .retinas
        .find_by_employee(employee.id)
        .await
        .unwrap();
    assert_eq!(retinas[0].document_id.as_deref(), Some("doc-1"));

    let req = test::TestRequest::post()
        .uri("/storage/analysis-callback")
        .set_json(json!({ "status": "success", "id": "x", "imgId": retina_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_retinas_not_reachable_through_own_organization_path() {
    let ctx = TestContext::new();
    let victim = ctx.organization("Victim").await;
    let attacker = ctx.organization("Attacker").await;
    let employee = ctx.employee(victim.id).await;
    let root = ctx.super_admin().await;
    let (_, token) = ctx.user("oa@attacker.io", UserRole::OrgAdmin, Some(attacker.id)).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = multipart_post(
        &format!("/storage/organizations/{}/employees/{}/retinas", victim.id, employee.id),
        &root,
        Some(("eye.jpg", IMAGE)),
        &[],
    )
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let retina_id = body["id"].as_str().unwrap().to_string();

    let base = format!(
        "/storage/organizations/{}/employees/{}/retinas",
        attacker.id, employee.id
    );
    let requests = [
        test::TestRequest::get().uri(&base),
        test::TestRequest::get().uri(&format!("{}/{}", base, retina_id)),
        test::TestRequest::delete().uri(&format!("{}/{}", base, retina_id)),
    ];
    for req in requests {
        let resp = test::call_service(&app, req.insert_header(bearer(&token)).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], format!("Employee with ID {} not found", employee.id));
    }

    // The victim's photo survives
    assert_eq!(ctx.components.blobs.paths().await.len(), 1);

    let req = test::TestRequest::get()
        .uri(&format!(
            "/storage/organizations/{}/employees/{}/retinas",
            victim.id, employee.id
        ))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_retina_routes_require_token() {
    let ctx = TestContext::new();
    let organization = ctx.organization("Acme").await;
    let employee = ctx.employee(organization.id).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri(&format!(
            "/storage/organizations/{}/employees/{}/retinas",
            organization.id, employee.id
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_multipart_size_is_capped_across_parts() {
    let ctx = TestContext::with_upload_limit(256);
    let token = ctx.super_admin().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    // Every part fits on its own; together they exceed the limit
    let filler = "x".repeat(200);
    let req = multipart_post(
        "/storage/upload",
        &token,
        Some(("scan.png", filler.as_bytes())),
        &[("note", "a"), ("padding", &filler[..100])],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(ctx.components.blobs.paths().await.is_empty());

    let req = multipart_post("/storage/upload", &token, Some(("scan.png", IMAGE)), &[]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_multipart_text_fields_are_small() {
    let ctx = TestContext::with_upload_limit(64 * 1024);
    let token = ctx.super_admin().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = multipart_post(
        "/storage/upload",
        &token,
        Some(("scan.png", IMAGE)),
        &[("note", &"y".repeat(2048))],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let req = multipart_post("/storage/upload", &token, Some(("scan.png", IMAGE)), &[]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
