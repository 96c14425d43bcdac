//! # Catalog API Server
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  tracing ──► CatalogConfig::load ──► ProductStore (seeded?) ──► router  │
//! │                                                                         │
//! │  axum::serve ... with_graceful_shutdown(Ctrl+C | SIGTERM)               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use chrono::Utc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use catalog_api::config::CatalogConfig;
use catalog_api::{router, AppState};
use catalog_store::{seed, ProductStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with_target(true)
        .init();

    info!("Starting catalog API server...");

    let config = CatalogConfig::load(None).context("Failed to load configuration")?;
    info!(
        address = %config.bind_address(),
        environment = %config.environment,
        seed = config.seed,
        "Configuration loaded"
    );

    if config.auth_disabled() {
        warn!("No API keys configured, authentication is disabled");
    }

    let store = if config.seed {
        let store = ProductStore::with_products(seed::sample_products(Utc::now()))
            .context("Failed to load demo catalog")?;
        info!(products = store.count().await, "Demo catalog loaded");
        store
    } else {
        ProductStore::new()
    };

    let address = config.bind_address();
    let app = router(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!(%address, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
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
