//! Application state management

use crate::auth::jwt::JwtConfig;
use medilocker_core::AppConfig;
use sqlx::PgPool;

/// Application state shared across handlers
///
/// Built once at startup; the signing configuration is derived here so no
/// component performs ambient environment lookups per request.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// PostgreSQL connection pool
    pub db: PgPool,
    /// Token signing configuration
    pub jwt_config: JwtConfig,
}

impl AppState {
    /// Create new application state with config and a connected pool
    pub fn new(config: AppConfig, db: PgPool) -> Self {
        let jwt_config = JwtConfig::from(&config.auth);
        Self {
            config,
            db,
            jwt_config,
        }
    }
}
