//! Integration tests for organizations, their members and employees

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use rv_api::create_app;
use rv_core::UserRole;

use common::{bearer, TestContext};

#[actix_web::test]
async fn test_create_and_list_organizations() {
    let ctx = TestContext::new();
    let token = ctx.super_admin().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/organizations")
        .insert_header(bearer(&token))
        .set_json(json!({ "name": "Acme" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let organization: Value = test::read_body_json(resp).await;
    let id = organization["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/organizations")
        .insert_header(bearer(&token))
        .set_json(json!({ "name": "Acme" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Organization with this name already exists");

    let req = test::TestRequest::post()
        .uri(&format!("/organizations/{}/employees", id))
        .insert_header(bearer(&token))
        .set_json(json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "birthDate": "1990-05-17",
            "position": "Engineer"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/organizations?page=1&limit=10")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["organizations"][0]["name"], "Acme");
    assert_eq!(body["organizations"][0]["_count"]["employees"], 1);
    assert_eq!(body["organizations"][0]["_count"]["users"], 0);
}

#[actix_web::test]
async fn test_org_admin_is_limited_to_own_organization() {
    let ctx = TestContext::new();
    let own = ctx.organization("Own").await;
    let other = ctx.organization("Other").await;
    let (_, token) = ctx.user("oa@example.com", UserRole::OrgAdmin, Some(own.id)).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri(&format!("/organizations/{}", own.id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/organizations/{}", other.id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "You are not a member of this organization");

    // Structural changes stay with super admins
    let req = test::TestRequest::delete()
        .uri(&format!("/organizations/{}", own.id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_member_management() {
    let ctx = TestContext::new();
    let token = ctx.super_admin().await;
    let acme = ctx.organization("Acme").await;
    let globex = ctx.organization("Globex").await;
    ctx.user("taken@example.com", UserRole::OrgAdmin, Some(globex.id)).await;
    ctx.user("loose@example.com", UserRole::Validator, None).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let add = |email: &str| {
        test::TestRequest::post()
            .uri(&format!("/organizations/{}/users", acme.id))
            .insert_header(bearer(&token))
            .set_json(json!({
                "email": email,
                "firstName": "New",
                "lastName": "Member",
                "password": "longenough"
            }))
            .to_request()
    };

    let resp = test::call_service(&app, add("member@example.com")).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], acme.id.to_string());

    let cases = [
        ("member@example.com", "User already belongs to this organization"),
        ("taken@example.com", "User already belongs to another organization"),
        ("loose@example.com", "Email already exists"),
    ];
    for (email, message) in cases {
        let resp = test::call_service(&app, add(email)).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], message);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/organizations/{}/users", acme.id))
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["users"][0]["role"], "ORG_ADMIN");
    let member_id = body["users"][0]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/organizations/{}/users/{}", acme.id, member_id))
        .insert_header(bearer(&token))
        .set_json(json!({ "role": "VALIDATOR", "firstName": "" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["role"], "VALIDATOR");
    assert_eq!(body["firstName"], "New");

    let req = test::TestRequest::delete()
        .uri(&format!("/organizations/{}/users/{}", globex.id, member_id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User does not belong to this organization");

    let req = test::TestRequest::delete()
        .uri(&format!("/organizations/{}/users/{}", acme.id, member_id))
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "User removed from organization");
}

#[actix_web::test]
async fn test_employee_access_across_organizations() {
    let ctx = TestContext::new();
    let own = ctx.organization("Own").await;
    let other = ctx.organization("Other").await;
    let foreign = ctx.employee(other.id).await;
    let mine = ctx.employee(own.id).await;
    let (_, token) = ctx.user("oa@example.com", UserRole::OrgAdmin, Some(own.id)).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri(&format!("/organizations/employees/{}", foreign.id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "You do not have access to this employee");

    let req = test::TestRequest::patch()
        .uri(&format!("/organizations/employees/{}", mine.id))
        .insert_header(bearer(&token))
        .set_json(json!({ "position": "Lead" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["position"], "Lead");
    assert_eq!(body["firstName"], "Jane");

    let req = test::TestRequest::get()
        .uri(&format!("/organizations/{}/employees", own.id))
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/organizations/employees/{}", mine.id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/organizations/employees/{}", mine.id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_employee_birth_date_must_be_iso() {
    let ctx = TestContext::new();
    let token = ctx.super_admin().await;
    let acme = ctx.organization("Acme").await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri(&format!("/organizations/{}/employees", acme.id))
        .insert_header(bearer(&token))
        .set_json(json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "birthDate": "17/05/1990",
            "position": "Engineer"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_org_admin_cannot_assign_super_admin() {
    let ctx = TestContext::new();
    let organization = ctx.organization("Acme").await;
    let (_, token) = ctx.user("oa@acme.io", UserRole::OrgAdmin, Some(organization.id)).await;
    let (member, _) = ctx.user("val@acme.io", UserRole::Validator, Some(organization.id)).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri(&format!("/organizations/{}/users", organization.id))
        .insert_header(bearer(&token))
        .set_json(json!({
            "email": "root2@acme.io",
            "firstName": "Eve",
            "lastName": "Root",
            "password": "password123",
            "role": "SUPER_ADMIN",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Insufficient permissions");

    let req = test::TestRequest::put()
        .uri(&format!("/organizations/{}/users/{}", organization.id, member.id))
        .insert_header(bearer(&token))
        .set_json(json!({ "role": "SUPER_ADMIN" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/users/email/find?email=root2@acme.io")
        .insert_header(bearer(&ctx.super_admin().await))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Organization roles stay assignable
    let req = test::TestRequest::put()
        .uri(&format!("/organizations/{}/users/{}", organization.id, member.id))
        .insert_header(bearer(&token))
        .set_json(json!({ "role": "ORG_ADMIN" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["role"], "ORG_ADMIN");
}
