//! CORS middleware configuration for cross-origin requests.
//!
//! Development accepts any origin; other environments accept the origins
//! listed in `cors.allowed_origins`.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use rv_shared::config::CorsConfig;

/// Creates a CORS middleware instance from configuration
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::HeaderName::from_static("x-requested-with"),
            header::HeaderName::from_static("x-message-id"),
        ])
        .max_age(config.max_age);

    if config.allows_any_origin() {
        cors = cors.allow_any_origin();
    } else {
        for origin in config.allowed_origins.iter().map(|o| o.trim()).filter(|o| !o.is_empty()) {
            cors = cors.allowed_origin(origin);
        }
    }

    if config.allow_credentials {
        cors = cors.supports_credentials();
    }

    cors
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};

    #[actix_web::test]
    async fn test_configured_origin_is_allowed() {
        let config = CorsConfig {
            allowed_origins: vec!["https://app.example.com".to_string()],
            ..Default::default()
        };
        let app = test::init_service(
            App::new()
                .wrap(create_cors(&config))
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/")
                .insert_header((header::ORIGIN, "https://app.example.com"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://app.example.com"
        );
    }
}
