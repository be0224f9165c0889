//! Helpers shared by the HTTP tests: an application over the in-memory
//! backend and a few request builders

#![allow(dead_code)]

use actix_web::{http::header, test, web};
use chrono::NaiveDate;
use uuid::Uuid;

use rv_api::{ApiSettings, AppState};
use rv_core::{
    Components, Employee, EmployeeRepository, MockBackend, NewUser, Organization,
    OrganizationRepository, ServiceSettings, Services, User, UserRole,
};

pub const PASSWORD: &str = "Secret1!";
pub const CALLBACK_KEY: &str = "test-callback-key";
pub const BOUNDARY: &str = "rv-test-boundary";

pub struct TestContext {
    pub components: Components<MockBackend>,
    pub state: web::Data<AppState<MockBackend>>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_settings(ServiceSettings::default())
    }

    pub fn with_settings(settings: ServiceSettings) -> Self {
        Self::build(settings, ApiSettings::default())
    }

    /// Application accepting multipart bodies of at most `limit` bytes
    pub fn with_upload_limit(limit: usize) -> Self {
        Self::build(
            ServiceSettings::default(),
            ApiSettings {
                max_upload_size: limit,
                ..ApiSettings::default()
            },
        )
    }

    fn build(settings: ServiceSettings, api: ApiSettings) -> Self {
        let components = Components::in_memory();
        let services = Services::new(components.clone(), settings);
        let api = ApiSettings {
            callback_key: Some(CALLBACK_KEY.to_string()),
            ..api
        };

        Self {
            components,
            state: web::Data::new(AppState::new(services, None, api)),
        }
    }

    /// Creates a user and returns it with a fresh access token
    pub async fn user(&self, email: &str, role: UserRole, organization_id: Option<Uuid>) -> (User, String) {
        let services = &self.state.services;
        let user = services
            .users
            .create(NewUser {
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: email.to_string(),
                password: PASSWORD.to_string(),
                role: Some(role),
                organization_id,
            })
            .await
            .unwrap();
        let session = services.auth.login(email, PASSWORD).await.unwrap();
        (user, session.tokens.access_token)
    }

    pub async fn super_admin(&self) -> String {
        self.user("root@example.com", UserRole::SuperAdmin, None).await.1
    }

    pub async fn organization(&self, name: &str) -> Organization {
        self.components
            .organizations
            .create(Organization::new(name))
            .await
            .unwrap()
    }

    pub async fn employee(&self, organization_id: Uuid) -> Employee {
        self.components
            .employees
            .create(Employee::new(
                organization_id,
                "Jane",
                "Doe",
                NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                "Engineer",
            ))
            .await
            .unwrap()
    }
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// `multipart/form-data` body with an optional `file` part and text fields
pub fn multipart(file: Option<(&str, &[u8])>, fields: &[(&str, &str)]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: image/jpeg\r\n\r\n",
                BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

/// POST request carrying a multipart body
pub fn multipart_post(uri: &str, token: &str, file: Option<(&str, &[u8])>, fields: &[(&str, &str)]) -> test::TestRequest {
    let (content_type, body) = multipart(file, fields);
    test::TestRequest::post()
        .uri(uri)
        .insert_header(bearer(token))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
}
