// =============================================================================
// Tickers & Instruments — 24h summaries and exchange metadata
// =============================================================================
//
// Eligible universe: contract type PERPETUAL, status TRADING, quote USDT.
// =============================================================================

use serde::{Deserialize, Serialize};

/// 24h rolling summary for one symbol, decoded from the provider's string
/// encodings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSnapshot {
    pub symbol: String,
    pub last_price: f64,
    /// 24h change in percent (e.g. 3.2 means +3.2%).
    pub price_change_percent: f64,
    pub volume: f64,
    pub quote_volume: f64,
    pub trade_count: u64,
    pub high_price: f64,
    pub low_price: f64,
    pub weighted_avg_price: f64,
}

impl TickerSnapshot {
    /// `high >= low >= 0` and `quote_volume >= 0`.
    pub fn is_consistent(&self) -> bool {
        self.high_price >= self.low_price
            && self.low_price >= 0.0
            && self.quote_volume >= 0.0
            && self.last_price.is_finite()
            && self.price_change_percent.is_finite()
    }

    /// Intraday high/low range as a percentage of the low.  Zero when the low
    /// is zero.
    pub fn range_percent(&self) -> f64 {
        if self.low_price > 0.0 {
            (self.high_price - self.low_price) / self.low_price * 100.0
        } else {
            0.0
        }
    }
}

/// Tradable instrument metadata from the exchange info endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentInfo {
    pub symbol: String,
    pub contract_type: String,
    pub status: String,
    pub base_asset: String,
    pub quote_asset: String,
}

impl InstrumentInfo {
    /// USDT-margined perpetual that is currently trading.
    pub fn is_eligible(&self) -> bool {
        self.contract_type == "PERPETUAL" && self.status == "TRADING" && self.quote_asset == "USDT"
    }
}
