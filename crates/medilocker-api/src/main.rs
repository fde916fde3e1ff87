//! Medilocker API Server
//!
//! REST API server for the Medilocker authentication and audit subsystem.

use medilocker_api::{create_router, state::AppState};
use medilocker_core::AppConfig;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration; a missing DATABASE_URL or JWT_SECRET is fatal here
    let config = AppConfig::from_env()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("medilocker_api={},tower_http=info", config.logging.level).into()
    });
    if config.logging.json_format {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // Connect to storage and apply schema
    let pool = PgPoolOptions::new()
        .max_connections(config.database.pool_size)
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Create application state and router
    let state = Arc::new(AppState::new(config, pool));
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Medilocker API server starting on http://{}", addr);
    tracing::info!("Authentication subsystem enabled");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
