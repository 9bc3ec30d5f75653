//! Metrics Host - Demo Server for the Metrics Add-on
//!
//! A small axum application instrumented by the add-on. Runs until
//! SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml (bind address, log level)
//! 2. Init tracing (JSON or human-readable)
//! 3. Read PROMETHEUS_* / STAGE / DYNO / HEROKU_APP_NAME from env
//! 4. Build the single process-wide MetricsRegistry
//! 5. Register host routes, then install metrics on top
//! 6. Serve until ctrl-c, then stop the push loop

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::Path;
use axum::routing::get;
use axum::Router;
use tokio::signal;
use tracing::info;

use express_prom_metrics::config::loader;
use express_prom_metrics::{MetricsBootstrap, MetricsConfig, MetricsRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load host configuration ──────────────────────────
    let host = loader::load_config("config.toml").context("Failed to load configuration")?;

    // ── 2. Initialize logging ───────────────────────────────
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&host.server.log_level));
    if host.server.json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // ── 3. Metrics configuration from env ───────────────────
    let metrics_config = MetricsConfig::from_env();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        serve = metrics_config.serve_enabled,
        push = metrics_config.push.enabled,
        stage = %metrics_config.deployment.stage,
        "Starting metrics host"
    );

    // ── 4. Registry ─────────────────────────────────────────
    let registry = Arc::new(MetricsRegistry::new().context("Failed to create metrics registry")?);

    // ── 5. Host routes, then metrics ────────────────────────
    let app = Router::new()
        .route("/", get(|| async { "OK" }))
        .route("/users/:id", get(|Path(id): Path<String>| async move { format!("user {id}") }));

    let installation = MetricsBootstrap::new(metrics_config, registry).install(app);

    // ── 6. Serve ────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&host.server.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", host.server.bind_address))?;
    info!(address = %host.server.bind_address, "HTTP server started");

    axum::serve(listener, installation.router)
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            info!("SIGINT received, shutting down");
        })
        .await?;

    if let Some(task) = installation.push_task {
        task.abort();
    }

    info!("Shutdown complete");
    Ok(())
}
