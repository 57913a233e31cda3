// File: services/vetclinic_backend/src/main.rs
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use vetclinic_backend::{build_router, API_PREFIX};
use vetclinic_common::{init_error_mode, logging, Context};
use vetclinic_config::load_config;
use vetclinic_db::{schema, DbClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(load_config().context("Failed to load config")?);

    logging::init_from_config(config.server.log_level.as_deref());
    init_error_mode(config.server.environment);
    info!(
        "Starting VetClinic backend ({:?} mode, Stripe {})",
        config.server.environment,
        if config.use_stripe { "enabled" } else { "disabled" }
    );

    let db = DbClient::new(&config)
        .await
        .context("Failed to connect to the database")?;
    schema::init_schema(&db)
        .await
        .context("Failed to initialize the database schema")?;

    let app = build_router(config.clone(), db);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}{}", addr, API_PREFIX);

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        logging::log_error(&e, "Server stopped");
        return Err(e.into());
    }
    Ok(())
}
