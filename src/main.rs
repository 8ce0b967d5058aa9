// =============================================================================
// Momentum Radar — Main Entry Point
// =============================================================================
//
// Runs a scan pass every `scan_interval_secs` and serves the latest result
// over HTTP until Ctrl+C.
// =============================================================================

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use momentum_radar::api;
use momentum_radar::app_state::AppState;
use momentum_radar::binance::BinanceFuturesClient;
use momentum_radar::runtime_config::ScannerConfig;
use momentum_radar::scanner::Scanner;

const CONFIG_PATH: &str = "scanner_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Momentum Radar starting up");

    let mut config = ScannerConfig::load_or_default(CONFIG_PATH);
    config.apply_env_overrides();

    info!(
        base_url = %config.base_url,
        shortlist = config.shortlist_size,
        concurrency = config.max_concurrent_evaluations,
        interval_secs = config.scan_interval_secs,
        "Configuration ready"
    );

    // ── 2. Market data client & scanner ──────────────────────────────────
    let client = BinanceFuturesClient::new(config.base_url.clone())?;
    let rate_limit = client.rate_limit();
    let scanner = Scanner::new(Arc::new(client), config.clone());
    let state = Arc::new(AppState::new(scanner, Some(rate_limit)));

    // ── 3. Scan loop ─────────────────────────────────────────────────────
    let loop_state = state.clone();
    let interval_secs = config.scan_interval_secs;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(interval_secs));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            // failures are logged and recorded by AppState
            let _ = loop_state.run_and_record().await;
        }
    });

    // ── 4. API server ────────────────────────────────────────────────────
    let app = api::router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .context("API server failed")?;

    info!("Momentum Radar stopped");
    Ok(())
}
