//! Application state and factory
//!
//! `create_app` assembles the Actix-web application from a set of services;
//! the binary and the HTTP tests both go through it.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error,
};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use rv_core::{Backend, Services};
use rv_infra::DatabasePool;
use rv_shared::{AppConfig, CorsConfig};

use crate::handlers::error::{json_error_handler, not_found, path_error_handler, query_error_handler};
use crate::middleware::{create_cors, Authenticator, ErrorEnvelope, SecurityHeaders};
use crate::routes;

/// HTTP-level settings taken from the application configuration
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub cors: CorsConfig,
    /// Shared key expected on matching-service callbacks
    pub callback_key: Option<String>,
    pub max_json_size: usize,
    pub max_upload_size: usize,
    /// Send Strict-Transport-Security
    pub security_hsts: bool,
}

impl ApiSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            cors: config.cors.clone(),
            callback_key: config.matching.callback_key.clone(),
            max_json_size: config.server.max_json_size,
            max_upload_size: config.server.max_upload_size,
            security_hsts: config.environment.is_production(),
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        let config = AppConfig::default();
        Self::from_config(&config)
    }
}

/// Everything a handler can reach
pub struct AppState<B: Backend> {
    pub services: Services<B>,
    /// Absent when running on the in-memory backend
    pub database: Option<DatabasePool>,
    pub settings: ApiSettings,
}

impl<B: Backend> AppState<B> {
    pub fn new(services: Services<B>, database: Option<DatabasePool>, settings: ApiSettings) -> Self {
        Self {
            services,
            database,
            settings,
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<B: Backend>(
    state: web::Data<AppState<B>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let settings = state.settings.clone();
    let authenticator: Arc<dyn Authenticator> = state.services.auth.clone();

    let cors = create_cors(&settings.cors);
    let security = if settings.security_hsts {
        SecurityHeaders::production()
    } else {
        SecurityHeaders::new()
    };

    App::new()
        .app_data(state)
        .app_data(web::Data::from(authenticator))
        .app_data(
            web::JsonConfig::default()
                .limit(settings.max_json_size)
                .error_handler(json_error_handler),
        )
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        // Order matters: the last wrap runs first
        .wrap(ErrorEnvelope)
        .wrap(security)
        .wrap(cors)
        .wrap(TracingLogger::default())
        .configure(|cfg| routes::configure::<B>(cfg, &settings))
        .default_service(web::route().to(not_found))
}
