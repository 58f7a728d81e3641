use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use server::config::Settings;
use server::db::{create_pool, run_migrations, AppState};
use server::store::PgStore;

/// How often expired rate-limit windows are dropped.
const RATE_LIMIT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    server::telemetry::init_tracing()?;

    let settings = Settings::from_env().map_err(anyhow::Error::msg)?;
    let telemetry = server::telemetry::init_otlp(settings.app.features.telemetry)?;
    server::health::record_start_time();

    tracing::info!(
        timezone = %settings.timezone,
        slots = settings.slot_starts.len(),
        stripe = settings.app.features.stripe,
        otlp = telemetry.otlp_enabled(),
        "Configuration loaded"
    );

    let pool = create_pool().map_err(anyhow::Error::msg)?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    let state = AppState::new(Arc::new(PgStore::new(pool)), settings);

    let limits = state.rate_limits.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RATE_LIMIT_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = limits.sweep();
            if removed > 0 {
                tracing::debug!(removed, remaining = limits.tracked(), "Swept rate-limit windows");
            }
        }
    });

    let app = server::openapi::app_router(state);

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        .parse()
        .context("BIND_ADDR is not a valid socket address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "Padel club API listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM so in-flight requests can finish.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
