// =============================================================================
// Binance Module
// =============================================================================
//
// Public USDⓈ-M futures market data over REST, plus request-weight tracking.

pub mod client;
pub mod rate_limit;

pub use client::{BinanceFuturesClient, DEFAULT_BASE_URL};
pub use rate_limit::{RateLimitSnapshot, RateLimitTracker};
