// =============================================================================
// Bounded Evaluator — deep per-symbol evaluation of the shortlist
// =============================================================================
//
// Each shortlisted symbol becomes one task on a JoinSet.  A task first takes
// a permit from a fixed-width semaphore, then fetches in parallel:
//
//   1H + 4H klines (trend)   15m klines (confirmation)
//   mark / funding snapshot  open-interest history
//
// and turns them into an `EvaluatedSymbol`.  Tasks share nothing mutable:
// each returns `(shortlist_index, Option<EvaluatedSymbol>)` and the caller
// restores shortlist order once everything has joined.
// =============================================================================

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::market_data::{CandleSeries, MarketDataSource};
use crate::runtime_config::ScannerConfig;
use crate::scanner::prescreen::ScreenedSymbol;
use crate::scoring::{score_symbol, BundleInputs, EvaluatedSymbol, IndicatorBundle};

/// Trend series shorter than this are not scored.
pub const MIN_TREND_BARS: usize = 30;

pub const TREND_INTERVAL_FAST: &str = "1h";
pub const TREND_INTERVAL_SLOW: &str = "4h";
pub const CONFIRM_INTERVAL: &str = "15m";

/// What to fetch for every symbol.
#[derive(Debug, Clone)]
pub struct FetchPlan {
    pub trend_kline_limit: u32,
    pub confirm_kline_limit: u32,
    pub oi_period: String,
    pub oi_history_limit: u32,
}

impl From<&ScannerConfig> for FetchPlan {
    fn from(config: &ScannerConfig) -> Self {
        Self {
            trend_kline_limit: config.trend_kline_limit,
            confirm_kline_limit: config.confirm_kline_limit,
            oi_period: config.oi_period.clone(),
            oi_history_limit: config.oi_history_limit,
        }
    }
}

/// Fetch and score one symbol.  `Ok(None)` means too little history.
pub async fn evaluate_symbol(
    source: &dyn MarketDataSource,
    plan: &FetchPlan,
    candidate: &ScreenedSymbol,
) -> Result<Option<EvaluatedSymbol>> {
    let symbol = candidate.symbol.as_str();

    let (k1h, k4h, k15m, mark, oi) = tokio::try_join!(
        async {
            source
                .klines(symbol, TREND_INTERVAL_FAST, plan.trend_kline_limit)
                .await
                .context("1h klines")
        },
        async {
            source
                .klines(symbol, TREND_INTERVAL_SLOW, plan.trend_kline_limit)
                .await
                .context("4h klines")
        },
        async {
            source
                .klines(symbol, CONFIRM_INTERVAL, plan.confirm_kline_limit)
                .await
                .context("15m klines")
        },
        async { source.mark_snapshot(symbol).await.context("mark snapshot") },
        async {
            source
                .open_interest_history(symbol, &plan.oi_period, plan.oi_history_limit)
                .await
                .context("open interest history")
        },
    )?;

    let trend_1h = CandleSeries::new(symbol, TREND_INTERVAL_FAST, k1h);
    let trend_4h = CandleSeries::new(symbol, TREND_INTERVAL_SLOW, k4h);
    let confirm_15m = CandleSeries::new(symbol, CONFIRM_INTERVAL, k15m);

    if trend_1h.len() < MIN_TREND_BARS || trend_4h.len() < MIN_TREND_BARS {
        debug!(
            symbol,
            bars_1h = trend_1h.len(),
            bars_4h = trend_4h.len(),
            "insufficient history, skipping"
        );
        return Ok(None);
    }

    let Some(price) = trend_1h.last_close() else {
        return Ok(None);
    };

    let bundle = IndicatorBundle::compute(&BundleInputs {
        trend_1h: &trend_1h,
        trend_4h: &trend_4h,
        confirm_15m: &confirm_15m,
        mark: &mark,
        open_interest: &oi,
    });

    Ok(Some(score_symbol(symbol, &bundle, candidate.change_24h, price)))
}

/// Evaluate the whole shortlist with at most `max_in_flight` symbols being
/// fetched at once.  Output follows shortlist order; failed or thin symbols
/// are absent.
pub async fn evaluate_shortlist(
    source: Arc<dyn MarketDataSource>,
    plan: FetchPlan,
    shortlist: &[ScreenedSymbol],
    max_in_flight: usize,
) -> Vec<EvaluatedSymbol> {
    let permits = Arc::new(Semaphore::new(max_in_flight.clamp(1, Semaphore::MAX_PERMITS)));
    let plan = Arc::new(plan);
    let mut join_set: JoinSet<(usize, Option<EvaluatedSymbol>)> = JoinSet::new();

    for (index, candidate) in shortlist.iter().cloned().enumerate() {
        let source = Arc::clone(&source);
        let plan = Arc::clone(&plan);
        let permits = Arc::clone(&permits);

        join_set.spawn(async move {
            let _permit = match permits.acquire_owned().await {
                Ok(p) => p,
                Err(_) => return (index, None),
            };
            match evaluate_symbol(source.as_ref(), &plan, &candidate).await {
                Ok(result) => (index, result),
                Err(e) => {
                    warn!(symbol = %candidate.symbol, error = %format!("{e:#}"), "evaluation failed, dropping symbol");
                    (index, None)
                }
            }
        });
    }

    let mut collected: Vec<(usize, EvaluatedSymbol)> = Vec::with_capacity(shortlist.len());
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, Some(evaluated))) => collected.push((index, evaluated)),
            Ok((_, None)) => {}
            Err(e) => warn!(error = %e, "evaluation task aborted"),
        }
    }

    collected.sort_by_key(|(index, _)| *index);
    collected.into_iter().map(|(_, evaluated)| evaluated).collect()
}
