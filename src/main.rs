// =============================================================================
// Aurum Desk — Main Entry Point
// =============================================================================
//
// Serves synthetic gold series and their technical analysis over REST until
// Ctrl+C, then persists the runtime config.
// =============================================================================

use std::sync::Arc;

use chrono::{Duration, DurationRound, Utc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use aurum_desk::api;
use aurum_desk::app_state::AppState;
use aurum_desk::market_data::RandomWalkSource;
use aurum_desk::runtime_config::RuntimeConfig;

const CONFIG_PATH: &str = "desk_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Aurum Desk starting up");

    let mut config = RuntimeConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });
    config.apply_overrides(|key| std::env::var(key).ok());

    if config.instruments.is_empty() {
        warn!("No instruments configured, restoring defaults");
        config.instruments = RuntimeConfig::default().instruments;
    }

    let symbols: Vec<&str> = config.instruments.iter().map(|i| i.symbol.as_str()).collect();
    info!(
        instruments = ?symbols,
        history_days = config.history_days,
        seed = config.seed,
        "Configured instruments"
    );

    // ── 2. Price source & shared state ───────────────────────────────────
    // Daily bars end at today's midnight UTC so restarts within a day serve
    // the same series.
    let end = Utc::now().duration_trunc(Duration::days(1))?;
    let source = RandomWalkSource::new(config.seed, config.history_days, end);

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, Box::new(source)));

    // ── 3. REST API ──────────────────────────────────────────────────────
    let app = api::router(Arc::clone(&state));
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            warn!("Shutdown signal received, stopping gracefully");
        })
        .await?;

    // ── 4. Persist config ────────────────────────────────────────────────
    if let Err(e) = state.runtime_config.read().save(CONFIG_PATH) {
        error!(error = %e, "Failed to save runtime config on shutdown");
    }

    info!("Aurum Desk shut down complete.");
    Ok(())
}
