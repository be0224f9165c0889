use actix_web::{web, HttpServer};
use anyhow::Context;

use rv_api::{bootstrap, create_app, telemetry, ApiSettings, AppState};
use rv_core::{ServiceSettings, Services};
use rv_infra::{DatabasePool, MySqlBackend};
use rv_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    telemetry::init(&config.logging)?;

    tracing::info!(
        environment = ?config.environment,
        address = %config.server.bind_address(),
        "Starting RetinaVerify API"
    );

    let database = DatabasePool::new(&config.database)
        .await
        .context("failed to connect to the database")?;
    if config.database.run_migrations {
        database
            .run_migrations()
            .await
            .context("failed to run database migrations")?;
    }

    let components = MySqlBackend::components(&database, &config)?;
    let settings = ServiceSettings::from_config(&config.auth.jwt, &config.matching)?;
    let services = Services::new(components, settings);

    if let Ok(password) = std::env::var("SEED_ADMIN_PASSWORD") {
        if !password.is_empty() {
            bootstrap::seed_admin(&services, &password).await?;
        }
    }

    let state = web::Data::new(AppState::new(
        services,
        Some(database.clone()),
        ApiSettings::from_config(&config),
    ));

    let mut server = HttpServer::new(move || create_app(state.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(config.server.bind_address())
        .with_context(|| format!("failed to bind {}", config.server.bind_address()))?
        .run()
        .await?;

    database.close().await;
    tracing::info!("Server stopped");
    Ok(())
}
