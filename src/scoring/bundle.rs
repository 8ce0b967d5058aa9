// =============================================================================
// Indicator Bundle — every derived value the scorer consumes for one symbol
// =============================================================================
//
// Built once per symbol per scan pass from freshly fetched series; nothing is
// carried between passes.
//
//   1H  : RSI, MACD, EMA trend, volume spike, volatility, breakout
//   4H  : RSI, MACD, EMA trend, breakout
//   15m : volume spike (confirmation)
//   OI history + mark snapshot : OI delta %, funding %
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::futures_intel::{open_interest_delta_pct, MarkSnapshot, OpenInterestPoint};
use crate::indicators::ema::{TREND_FAST_PERIOD, TREND_SLOW_PERIOD};
use crate::indicators::rsi::RSI_PERIOD;
use crate::indicators::volume::VOLUME_LOOKBACK;
use crate::indicators::{ema_trend_score, macd, rsi, volatility_percent, volume_spike_ratio, Macd};
use crate::market_data::CandleSeries;
use crate::scoring::classifier::BreakoutState;

/// Fetched inputs for one symbol, borrowed for the duration of the build.
pub struct BundleInputs<'a> {
    pub trend_1h: &'a CandleSeries,
    pub trend_4h: &'a CandleSeries,
    pub confirm_15m: &'a CandleSeries,
    pub mark: &'a MarkSnapshot,
    pub open_interest: &'a [OpenInterestPoint],
}

/// Derived indicator values for one symbol in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorBundle {
    pub rsi_1h: f64,
    pub rsi_4h: f64,
    pub macd_1h: Macd,
    pub macd_4h: Macd,
    /// EMA(20)/EMA(50) divergence in percent.
    pub trend_1h: f64,
    pub trend_4h: f64,
    pub volume_ratio_1h: f64,
    pub volume_ratio_15m: f64,
    /// Volatility of 1H returns, in percent.
    pub volatility_pct: f64,
    pub oi_delta_pct: f64,
    pub funding_rate_pct: f64,
    pub breakout_1h: BreakoutState,
    pub breakout_4h: BreakoutState,
}

impl IndicatorBundle {
    pub fn compute(inputs: &BundleInputs<'_>) -> Self {
        let closes_1h = inputs.trend_1h.closes();
        let closes_4h = inputs.trend_4h.closes();

        Self {
            rsi_1h: rsi(&closes_1h, RSI_PERIOD),
            rsi_4h: rsi(&closes_4h, RSI_PERIOD),
            macd_1h: macd(&closes_1h),
            macd_4h: macd(&closes_4h),
            trend_1h: ema_trend_score(&closes_1h, TREND_FAST_PERIOD, TREND_SLOW_PERIOD),
            trend_4h: ema_trend_score(&closes_4h, TREND_FAST_PERIOD, TREND_SLOW_PERIOD),
            volume_ratio_1h: volume_spike_ratio(&inputs.trend_1h.volumes(), VOLUME_LOOKBACK),
            volume_ratio_15m: volume_spike_ratio(&inputs.confirm_15m.volumes(), VOLUME_LOOKBACK),
            volatility_pct: volatility_percent(&closes_1h),
            oi_delta_pct: open_interest_delta_pct(inputs.open_interest),
            funding_rate_pct: inputs.mark.funding_rate_pct(),
            breakout_1h: BreakoutState::from_series(inputs.trend_1h),
            breakout_4h: BreakoutState::from_series(inputs.trend_4h),
        }
    }
}
