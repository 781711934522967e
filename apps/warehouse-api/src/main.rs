//! # Warehouse API Server
//!
//! Entry point: load configuration, open the store, serve until a shutdown
//! signal arrives, then close the store.
//!
//! ```text
//! dotenvy (.env) → ApiConfig::load → Database::new ──► serve ──► db.close
//!                                        │
//!                                        └── failure: logged, exit non-zero
//! ```

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use warehouse_api::{build_router, ApiConfig, AppState};
use warehouse_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting warehouse inventory server...");

    let config = ApiConfig::load().context("failed to load configuration")?;
    info!(
        addr = %config.bind_address(),
        database = %config.database_path,
        "Configuration loaded"
    );

    let db = match Database::new(config.db_config()).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "Failed to open the product store");
            return Err(e).context("failed to open the product store");
        }
    };
    info!("Product store ready");

    let addr = config.bind_address();
    let state = Arc::new(AppState::new(config, db.clone()));
    let app = build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    info!(%addr, "Listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    db.close().await;
    served.context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
