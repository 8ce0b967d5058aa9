// =============================================================================
// Human-readable explanations for a scored symbol
// =============================================================================
//
// Every string here is derived from the same bundle the scorer used, with
// thresholds kept next to the wording that depends on them.
// =============================================================================

use crate::futures_intel::FundingPressure;
use crate::scoring::classifier::{histogram_aligned, rsi_aligned, trend_aligned, BREAKOUT_LOOKBACK};
use crate::scoring::IndicatorBundle;
use crate::types::Direction;

const NOTABLE_VOLUME: f64 = 1.4;
const NOTABLE_OI_DELTA: f64 = 0.5;

const STRONG_TREND: f64 = 2.0;
const MODERATE_TREND: f64 = 0.5;

const HEAVY_OI_DELTA: f64 = 2.0;
const HEAVY_VOLUME: f64 = 1.5;

fn bias_word(direction: Direction) -> &'static str {
    match direction {
        Direction::Long => "bullish",
        Direction::Short => "bearish",
    }
}

/// One-sentence summary of what drove the score.
pub fn reason(bundle: &IndicatorBundle, direction: Direction) -> String {
    let bias = bias_word(direction);
    let mut parts: Vec<String> = Vec::new();

    if bundle.volume_ratio_1h >= NOTABLE_VOLUME {
        parts.push(format!("1H volume {:.2}x average", bundle.volume_ratio_1h));
    }
    if bundle.volume_ratio_15m >= NOTABLE_VOLUME {
        parts.push(format!("15m volume {:.2}x average", bundle.volume_ratio_15m));
    }
    if trend_aligned(bundle, direction) {
        parts.push(format!("EMA trend {bias} on 1H and 4H"));
    }
    if histogram_aligned(bundle, direction) {
        let sign = match direction {
            Direction::Long => "positive",
            Direction::Short => "negative",
        };
        parts.push(format!("MACD histogram {sign} on both timeframes"));
    }
    if rsi_aligned(bundle, direction) {
        parts.push(format!("RSI {:.1} confirms {bias} bias", bundle.rsi_1h));
    }
    if bundle.oi_delta_pct.abs() > NOTABLE_OI_DELTA {
        let way = if bundle.oi_delta_pct > 0.0 { "up" } else { "down" };
        parts.push(format!("open interest {way} {:.2}%", bundle.oi_delta_pct.abs()));
    }
    if bundle.breakout_1h.confirms(direction) {
        let edge = match direction {
            Direction::Long => "high",
            Direction::Short => "low",
        };
        parts.push(format!("breaking {BREAKOUT_LOOKBACK}-bar {edge} on 1H"));
    }
    let pressure = FundingPressure::from_pct(bundle.funding_rate_pct);
    if pressure != FundingPressure::Normal {
        parts.push(format!("{pressure} funding {:+.4}%", bundle.funding_rate_pct));
    }

    if parts.is_empty() {
        return "No dominant signal; monitoring for confirmation".to_string();
    }
    format!("{direction} setup: {}", parts.join("; "))
}

pub fn trend_strength(bundle: &IndicatorBundle) -> String {
    let (t1, t4) = (bundle.trend_1h, bundle.trend_4h);
    let detail = format!("({t1:+.2}% 1H, {t4:+.2}% 4H)");

    let heading = if t1 > 0.0 && t4 > 0.0 {
        "uptrend"
    } else if t1 < 0.0 && t4 < 0.0 {
        "downtrend"
    } else {
        return format!("Mixed {detail}");
    };

    let magnitude = (t1.abs() + t4.abs()) / 2.0;
    let grade = if magnitude >= STRONG_TREND {
        "Strong"
    } else if magnitude >= MODERATE_TREND {
        "Moderate"
    } else {
        "Weak"
    };
    format!("{grade} {heading} {detail}")
}

pub fn breakout_signal(bundle: &IndicatorBundle, direction: Direction) -> String {
    let on_1h = bundle.breakout_1h.confirms(direction);
    let on_4h = bundle.breakout_4h.confirms(direction);
    let frames = match (on_1h, on_4h) {
        (true, true) => "1H and 4H",
        (true, false) => "1H",
        (false, true) => "4H",
        (false, false) => return format!("No breakout (inside {BREAKOUT_LOOKBACK}-bar range)"),
    };
    match direction {
        Direction::Long => format!("Breakout above {BREAKOUT_LOOKBACK}-bar high on {frames}"),
        Direction::Short => format!("Breakdown below {BREAKOUT_LOOKBACK}-bar low on {frames}"),
    }
}

/// Positioning read from open interest, weighted by 1H volume.
pub fn whale_activity(bundle: &IndicatorBundle) -> String {
    let oi = bundle.oi_delta_pct;
    if oi.abs() >= HEAVY_OI_DELTA && bundle.volume_ratio_1h >= HEAVY_VOLUME {
        format!("Heavy positioning: OI {oi:+.2}% on {:.2}x volume", bundle.volume_ratio_1h)
    } else if oi >= NOTABLE_OI_DELTA {
        format!("Accumulation: OI {oi:+.2}%")
    } else if oi <= -NOTABLE_OI_DELTA {
        format!("Unwinding: OI {oi:+.2}%")
    } else {
        format!("Quiet: OI {oi:+.2}%")
    }
}

pub fn volatility_label(volatility_pct: f64) -> String {
    let band = match volatility_pct {
        v if v < 4.0 => "Low",
        v if v < 8.0 => "Moderate",
        v if v < 12.0 => "High",
        _ => "Extreme",
    };
    format!("{band} ({volatility_pct:.2}%)")
}
