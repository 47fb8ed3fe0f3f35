//! Paddock - Formula 1 dashboard backend
//!
//! Serves live timing, lap telemetry, standings and the calendar over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paddock::live::LiveFeeds;
use paddock::{create_router, AppState, Config, HttpFetcher, PollingCache, ResponseCache};

/// Main entry point for the dashboard server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the HTTP fetcher and shared response cache
/// 4. Start the live feed subscriptions
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Cancel every subscription on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paddock=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Paddock dashboard server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, openf1={}, ergast={}, season={}, timeout={}s",
        config.server_port,
        config.openf1_base_url,
        config.ergast_base_url,
        config.season_year,
        config.request_timeout
    );

    let fetcher = HttpFetcher::new(config.request_timeout()).context("building HTTP client")?;
    let poller = PollingCache::new(ResponseCache::new(), Arc::new(fetcher));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));

    let state = AppState::start(poller, config);
    let feeds = state.feeds.clone();

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(feeds))
        .await
        .context("serving HTTP")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops all polling.
async fn shutdown_signal(feeds: Arc<LiveFeeds>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
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
                warn!(error = %err, "failed to install SIGTERM handler");
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

    feeds.cancel_all();
}
