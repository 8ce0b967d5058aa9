// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free numeric functions over ordered price/volume series.
// Insufficient data never errors: each function documents the neutral value
// it falls back to, so the scorer never sees NaN or Infinity.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod volatility;
pub mod volume;

pub use ema::{ema, ema_trend_score};
pub use macd::{macd, Macd};
pub use rsi::rsi;
pub use volatility::{standard_deviation, volatility_percent};
pub use volume::volume_spike_ratio;
