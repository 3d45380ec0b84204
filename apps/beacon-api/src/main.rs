//! # Beacon Orders API
//!
//! HTTP server for the beacon ordering app.
//!
//! ## Startup
//! ```text
//! .env ──► tracing ──► ApiConfig ──► SQLite pool + migrations
//!                                         │
//!                          seed_sample_data? ──► sample users / prices
//!                                         │
//!                                         ▼
//!                          axum::serve on host:port (3000)
//!                                         │
//!                          Ctrl+C / SIGTERM ──► graceful shutdown
//! ```

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use beacon_api::{init_tracing, router, ApiConfig, AppState};
use beacon_core::fixtures::{sample_prices, sample_users};
use beacon_db::{Database, DbConfig, InitializeOutcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal in production
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to read .env: {}", e);
        }
    }

    init_tracing();
    info!("Starting Beacon Orders API...");

    let config = ApiConfig::load().context("Failed to load configuration")?;
    info!(
        address = %config.bind_address(),
        database = %config.database_path,
        "Configuration loaded"
    );

    // An in-memory database lives on a single connection
    let db_config = if config.database_path == ":memory:" {
        DbConfig::in_memory()
    } else {
        DbConfig::new(&config.database_path).max_connections(config.max_connections)
    };

    let db = Database::new(db_config)
        .await
        .context("Failed to open database")?;
    info!("Database ready");

    if config.seed_sample_data {
        seed_sample_data(&db).await?;
    }

    let state = Arc::new(AppState::new(db.clone(), config.clone()));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;
    info!(address = %config.bind_address(), "Listening");
    info!("Health check: http://{}/api/health", config.bind_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Loads the sample directory into an empty database and fills missing prices.
async fn seed_sample_data(db: &Database) -> anyhow::Result<()> {
    match db.users().initialize(&sample_users()).await? {
        InitializeOutcome::Seeded { inserted } => info!(inserted, "Seeded sample users"),
        InitializeOutcome::AlreadyPopulated { existing } => {
            info!(existing, "User directory already populated")
        }
    }

    if db.prices().count().await? == 0 {
        let prices = sample_prices();
        for price in &prices {
            db.prices().upsert(price).await?;
        }
        info!(count = prices.len(), "Seeded sample prices");
    } else {
        info!("Price table already populated, keeping existing prices");
    }

    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
