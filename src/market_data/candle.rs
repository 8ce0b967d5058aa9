// =============================================================================
// Candles — closed OHLCV bars and per-interval series
// =============================================================================
//
// Indicators consume plain `&[f64]` slices, so a series hands out
// index-aligned close / high / low / volume arrays, always time-ascending.
// =============================================================================

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single closed OHLCV bar from the futures kline endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: i64,
    pub close_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        open_time: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        close_time: i64,
    ) -> Self {
        Self {
            open_time,
            close_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

// ---------------------------------------------------------------------------
// CandleSeries -- immutable, time-ascending bars for one (symbol, interval)
// ---------------------------------------------------------------------------

/// Time-ascending candles for one symbol and one interval, exposed as
/// index-aligned parallel arrays.
#[derive(Debug, Clone)]
pub struct CandleSeries {
    pub symbol: String,
    pub interval: String,
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Wrap fetched candles, sorting by open time so consumers never depend
    /// on provider ordering.
    pub fn new(symbol: impl Into<String>, interval: impl Into<String>, mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.open_time);
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
            candles,
        }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.low).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }

    /// Close of the most recent bar, if any.
    pub fn last_close(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }
}

impl std::fmt::Display for CandleSeries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{} ({} bars)", self.symbol, self.interval, self.candles.len())
    }
}
