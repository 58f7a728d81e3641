use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

use crate::config::Settings;
use crate::rate_limit::RateLimitState;
use crate::store::ClubStore;

/// Shared application state passed to Axum handlers via `State`.
/// Derives `FromRef` so middleware can extract just the piece it needs.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: Arc<dyn ClubStore>,
    pub settings: Arc<Settings>,
    pub rate_limits: RateLimitState,
}

impl AppState {
    pub fn new(store: Arc<dyn ClubStore>, settings: Settings) -> Self {
        let rate_limits = RateLimitState::new(settings.app.rate_limits.clone());
        Self {
            store,
            settings: Arc::new(settings),
            rate_limits,
        }
    }
}

/// Create a new database connection pool from environment variables.
/// Uses `connect_lazy` so no connections open until the first query.
pub fn create_pool() -> Result<Pool<Postgres>, String> {
    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

    let max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_lazy(&database_url)
        .map_err(|e| format!("Failed to create database pool: {e}"))
}

/// Run database migrations against the given pool.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
