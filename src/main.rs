//! Catalog Cache - A product-catalog cache service
//!
//! Provides a sharded, capacity-bounded LRU cache with asynchronous batch
//! eviction and binary snapshot export, behind a small HTTP API.

mod api;
mod cache;
mod config;
mod error;
mod models;
mod tasks;

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;
use tasks::spawn_snapshot_task;

/// Main entry point for the catalog cache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the sharded cache (spawning one eviction worker per shard)
/// 4. Start the background snapshot task (if enabled)
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Catalog Cache Service");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: shards={}, threshold={}, low_watermark={}, port={}, snapshot_interval={}s",
        config.shard_count,
        config.shard_threshold,
        config.low_watermark,
        config.server_port,
        config.snapshot_interval
    );

    // Create application state; invalid cache parameters are fatal here
    let state = AppState::from_config(&config).context("invalid cache configuration")?;
    info!("Sharded cache initialized");

    // Start background snapshot task unless disabled
    let snapshot_handle = if config.snapshot_interval > 0 {
        let handle = spawn_snapshot_task(
            state.cache.clone(),
            config.snapshot_interval,
            config.snapshot_dir.clone(),
        );
        info!("Background snapshot task started");
        Some(handle)
    } else {
        info!("Periodic snapshots disabled");
        None
    };

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(snapshot_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the snapshot task and allows graceful shutdown.
async fn shutdown_signal(snapshot_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = snapshot_handle {
        handle.abort();
        warn!("Snapshot task aborted");
    }
}
