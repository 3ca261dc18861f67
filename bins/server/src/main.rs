//! Kodi API Server
//!
//! Main entry point for the ledger service. Serves the HTTP API and, unless
//! disabled, reconciles the wallet feed on a fixed interval.

mod schedule;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kodi_api::{AppState, create_router};
use kodi_db::connect;
use kodi_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kodi=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = connect(&config.database)
        .await
        .context("failed to connect to database")?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let state = AppState::from_database(&db, config.fees.clone());

    let job = if config.reconciliation.enabled {
        Some(schedule::spawn_reconciliation(
            state.reconciler.clone(),
            &config.reconciliation,
        ))
    } else {
        info!("Scheduled reconciliation disabled");
        None
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(schedule::shutdown_signal())
        .await?;

    if let Some(job) = job {
        job.abort();
    }
    info!("Server shutdown complete");
    Ok(())
}
