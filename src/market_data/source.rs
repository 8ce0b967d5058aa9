// =============================================================================
// Market Data Source — the read-only collaborator a scan pass depends on
// =============================================================================
//
// Every call is a black box: any `Err` (network, HTTP status, decode) is
// handled by the caller at the granularity it affects.  A universe call
// failing fails the pass; a per-symbol call failing drops that symbol.
// =============================================================================

use anyhow::Result;
use async_trait::async_trait;

use super::{Candle, InstrumentInfo, TickerSnapshot};
use crate::futures_intel::{MarkSnapshot, OpenInterestPoint};

#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Tradable instruments with contract type, status and asset pair.
    async fn exchange_info(&self) -> Result<Vec<InstrumentInfo>>;

    /// Batch 24h ticker snapshot for every instrument.
    async fn tickers_24h(&self) -> Result<Vec<TickerSnapshot>>;

    /// Candle series for `symbol` on `interval` (e.g. "1h"), at most `limit` bars.
    async fn klines(&self, symbol: &str, interval: &str, limit: u32) -> Result<Vec<Candle>>;

    /// Mark price and funding snapshot.
    async fn mark_snapshot(&self, symbol: &str) -> Result<MarkSnapshot>;

    /// Recent open-interest history, in whatever order the provider returns.
    async fn open_interest_history(
        &self,
        symbol: &str,
        period: &str,
        limit: u32,
    ) -> Result<Vec<OpenInterestPoint>>;
}
