// =============================================================================
// Scanner Module — one scan pass, end to end
// =============================================================================
//
//   exchange info ─┐
//                  ├─> eligible universe ─> pre-screen ─> bounded evaluator
//   24h tickers  ──┘                                          │
//                                                             v
//                                          ranking ─> ScanResult (movers /
//                                                     strongest / full)
//
// A pass either produces a `ScanResult` (possibly with no qualifying symbol)
// or fails as a whole because the universe itself could not be loaded.

pub mod evaluator;
pub mod prescreen;
pub mod ranking;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::market_data::MarketDataSource;
use crate::runtime_config::ScannerConfig;
use crate::scoring::EvaluatedSymbol;

use evaluator::{evaluate_shortlist, FetchPlan};
use prescreen::prescreen;
use ranking::rank;

pub const NO_CANDIDATE_MESSAGE: &str = "No qualifying candidate this pass";

/// Outcome of one successful scan pass.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub scan_id: String,
    pub timestamp: DateTime<Utc>,
    /// Eligible instruments with a consistent ticker.
    pub universe_size: usize,
    pub shortlisted: usize,
    /// Symbols that produced a score (before the score floor).
    pub evaluated: usize,
    pub movers: Vec<EvaluatedSymbol>,
    pub strongest: Vec<EvaluatedSymbol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all: Option<Vec<EvaluatedSymbol>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub duration_ms: u64,
}

impl ScanResult {
    /// Copy without the full list, for callers that did not ask for it.
    pub fn without_full(&self) -> Self {
        Self {
            all: None,
            ..self.clone()
        }
    }
}

pub struct Scanner {
    source: Arc<dyn MarketDataSource>,
    config: ScannerConfig,
}

impl Scanner {
    pub fn new(source: Arc<dyn MarketDataSource>, config: ScannerConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Run one pass.  `Err` only when exchange info or the ticker batch could
    /// not be fetched; per-symbol problems just shrink the result.
    pub async fn run_pass(&self, include_full: bool) -> Result<ScanResult> {
        let started = Instant::now();
        let cfg = &self.config;

        let instruments = self
            .source
            .exchange_info()
            .await
            .context("failed to load exchange info")?;
        let eligible: HashSet<String> = instruments
            .into_iter()
            .filter(|i| i.is_eligible())
            .map(|i| i.symbol)
            .collect();

        let tickers = self
            .source
            .tickers_24h()
            .await
            .context("failed to load 24h tickers")?;
        let universe: Vec<_> = tickers
            .into_iter()
            .filter(|t| eligible.contains(&t.symbol))
            .filter(|t| {
                let ok = t.is_consistent();
                if !ok {
                    warn!(symbol = %t.symbol, "inconsistent ticker, skipping");
                }
                ok
            })
            .collect();

        let shortlist = prescreen(&universe, cfg.min_quote_volume, cfg.shortlist_size);

        let evaluated = evaluate_shortlist(
            Arc::clone(&self.source),
            FetchPlan::from(cfg),
            &shortlist,
            cfg.max_concurrent_evaluations,
        )
        .await;
        let evaluated_count = evaluated.len();

        let funnel = rank(
            evaluated,
            cfg.min_score,
            cfg.movers_count,
            cfg.strongest_count,
            include_full,
        );
        let message = funnel.is_empty().then(|| NO_CANDIDATE_MESSAGE.to_string());

        let result = ScanResult {
            scan_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            universe_size: universe.len(),
            shortlisted: shortlist.len(),
            evaluated: evaluated_count,
            movers: funnel.movers,
            strongest: funnel.strongest,
            all: funnel.full,
            message,
            duration_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            scan_id = %result.scan_id,
            universe = result.universe_size,
            shortlisted = result.shortlisted,
            evaluated = result.evaluated,
            movers = result.movers.len(),
            top = result.movers.first().map(|m| m.symbol.as_str()).unwrap_or("-"),
            duration_ms = result.duration_ms,
            "scan pass complete"
        );

        Ok(result)
    }
}
