//! Portal Cache - diagnostics host
//!
//! Owns the process-wide cache, runs its background tasks and exposes the
//! stats and invalidation endpoints.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portal_cache::api::create_router;
use portal_cache::{spawn_stats_reporter, spawn_sweep_task, AppState, Cache, Config};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache with the configured capacity
/// 4. Start the TTL sweep task and, if enabled, the stats reporter
/// 5. Serve the diagnostics router on the configured port
/// 6. On SIGINT/SIGTERM stop the tasks and drop all cached entries
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portal_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting portal cache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, sweep_interval={}s, port={}, stats_reporting={}",
        config.max_entries, config.sweep_interval, config.server_port, config.stats_reporting
    );

    let state = AppState::from_config(&config);
    info!("Cache initialized");

    let mut tasks = vec![spawn_sweep_task(
        state.cache.clone(),
        Duration::from_secs(config.sweep_interval),
    )];
    if config.stats_reporting {
        tasks.push(spawn_stats_reporter(
            state.cache.clone(),
            Duration::from_secs(config.stats_report_interval),
        ));
    }
    info!("Background tasks started");

    let cache = state.cache.clone();
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Diagnostics listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(tasks, cache))
        .await
        .context("server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the background
/// tasks and releases the cache.
async fn shutdown_signal(tasks: Vec<JoinHandle<()>>, cache: Cache) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
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

    for task in tasks {
        task.abort();
    }
    warn!("Background tasks aborted");

    let removed = cache.clear_all();
    info!(removed, "Cache cleared");
}
