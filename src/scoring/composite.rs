// =============================================================================
// Composite Score, Risk Score, Confidence Tier
// =============================================================================
//
// Composite = sum of individually capped contributions, so no single factor
// can carry a symbol past the ranking floor on its own:
//
//   volume 1H      min((r-1)+ * 15, 12)     volume 15m   min((r-1)+ * 10, 8)
//   trend 1H       min(|t| * 5, 12)         trend 4H     min(|t| * 4, 10)
//   MACD 1H        min(|h%| * 400, 8)       MACD 4H      min(|h%| * 300, 6)
//   RSI alignment  10 aligned / 4 not       OI           min(|oi| * 3, 8)
//   volatility     min(vol * 0.8, 8)
//   + 6 per aligned group (trend, MACD, RSI)
//   + 8 breakout 1H, + 6.4 breakout 4H (in trade direction)
//   - max(|funding%| - 0.03, 0) * 120
//
// MACD histograms are expressed as a percentage of price before scaling.
// =============================================================================

use crate::futures_intel::funding_rate::FUNDING_ELEVATED_PCT;
use crate::scoring::classifier::{histogram_aligned, rsi_aligned, trend_aligned};
use crate::scoring::IndicatorBundle;
use crate::types::{Confidence, Direction};

const ALIGNMENT_BONUS: f64 = 6.0;
const BREAKOUT_BONUS_1H: f64 = 8.0;
const BREAKOUT_BONUS_4H: f64 = 6.4;
const RSI_ALIGNED_POINTS: f64 = 10.0;
const RSI_UNALIGNED_POINTS: f64 = 4.0;
const FUNDING_PENALTY_SCALE: f64 = 120.0;

/// Volume ratio above which volume is considered frothy for risk purposes.
pub const FROTHY_VOLUME: f64 = 2.2;

/// Capped `value * scale`.
fn capped(value: f64, scale: f64, cap: f64) -> f64 {
    (value * scale).min(cap)
}

/// Histogram as a percentage of price.
fn histogram_pct(histogram: f64, price: f64) -> f64 {
    if price > 0.0 {
        histogram / price * 100.0
    } else {
        0.0
    }
}

/// Composite momentum score, floored at 0 and rounded to 2 decimals.
/// Non-finite intermediate results collapse to 0.
pub fn composite_score(bundle: &IndicatorBundle, direction: Direction, price: f64) -> f64 {
    let volume = capped((bundle.volume_ratio_1h - 1.0).max(0.0), 15.0, 12.0)
        + capped((bundle.volume_ratio_15m - 1.0).max(0.0), 10.0, 8.0);

    let trend = capped(bundle.trend_1h.abs(), 5.0, 12.0) + capped(bundle.trend_4h.abs(), 4.0, 10.0);

    let macd = capped(histogram_pct(bundle.macd_1h.histogram, price).abs(), 400.0, 8.0)
        + capped(histogram_pct(bundle.macd_4h.histogram, price).abs(), 300.0, 6.0);

    let rsi_aligned = rsi_aligned(bundle, direction);
    let rsi = if rsi_aligned {
        RSI_ALIGNED_POINTS
    } else {
        RSI_UNALIGNED_POINTS
    };

    let open_interest = capped(bundle.oi_delta_pct.abs(), 3.0, 8.0);
    let volatility = capped(bundle.volatility_pct, 0.8, 8.0);

    let aligned_groups = [
        trend_aligned(bundle, direction),
        histogram_aligned(bundle, direction),
        rsi_aligned,
    ]
    .iter()
    .filter(|&&aligned| aligned)
    .count();
    let alignment = aligned_groups as f64 * ALIGNMENT_BONUS;

    let mut breakout = 0.0;
    if bundle.breakout_1h.confirms(direction) {
        breakout += BREAKOUT_BONUS_1H;
    }
    if bundle.breakout_4h.confirms(direction) {
        breakout += BREAKOUT_BONUS_4H;
    }

    let funding_penalty =
        (bundle.funding_rate_pct.abs() - FUNDING_ELEVATED_PCT).max(0.0) * FUNDING_PENALTY_SCALE;

    let total = volume + trend + macd + rsi + open_interest + volatility + alignment + breakout
        - funding_penalty;

    if total.is_finite() {
        round_to(total.max(0.0), 2)
    } else {
        0.0
    }
}

/// Risk score in [1, 10], one decimal.
///
///   volatility term  min(vol / 2.5, 6)
///   funding term     min(|funding%| * 40, 4)
///   OI stability     max(3 - min(|oi|, 3), 0)
///   volume term      1.5 frothy (>2.2x), 4 unconfirmed (1H < 1x), else 1
pub fn risk_score(bundle: &IndicatorBundle) -> f64 {
    let volatility = (bundle.volatility_pct / 2.5).min(6.0);
    let funding = (bundle.funding_rate_pct.abs() * 40.0).min(4.0);
    let oi_stability = (3.0 - bundle.oi_delta_pct.abs().min(3.0)).max(0.0);
    let volume = if bundle.volume_ratio_1h > FROTHY_VOLUME || bundle.volume_ratio_15m > FROTHY_VOLUME {
        1.5
    } else if bundle.volume_ratio_1h < 1.0 {
        4.0
    } else {
        1.0
    };

    let total = volatility + funding + oi_stability + volume;
    if !total.is_finite() {
        return 10.0;
    }
    round_to(total.clamp(1.0, 10.0), 1)
}

/// High above 90 with risk <= 4, Medium above 70 with risk <= 6, else Low.
pub fn confidence(composite: f64, risk: f64) -> Confidence {
    if composite > 90.0 && risk <= 4.0 {
        Confidence::High
    } else if composite > 70.0 && risk <= 6.0 {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
