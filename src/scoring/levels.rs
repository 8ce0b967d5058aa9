// =============================================================================
// Trade Levels — entry, three take-profits, stop, leverage band
// =============================================================================
//
// Take-profits are fixed percentage steps from entry:
//   Long  : +0.6%  +1.2%  +2.0%
//   Short : -0.6%  -1.2%  -2.2%
//
// Stop distance follows 1H volatility but is kept tight:
//   stop_fraction = clamp(volatility% / 150, 1.2%, 1.4%)
//
// Every level is rounded to a tick precision chosen from the entry price.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::types::Direction;

const LONG_TARGETS: [f64; 3] = [1.006, 1.012, 1.02];
const SHORT_TARGETS: [f64; 3] = [0.994, 0.988, 0.978];

const STOP_FRACTION_FLOOR: f64 = 0.012;
const STOP_FRACTION_CEILING: f64 = 0.014;
const STOP_VOLATILITY_DIVISOR: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeLevels {
    pub entry: f64,
    pub take_profit_1: f64,
    pub take_profit_2: f64,
    pub take_profit_3: f64,
    pub stop_loss: f64,
}

/// Decimal places used for a price of this magnitude.
pub fn tick_decimals(price: f64) -> i32 {
    let p = price.abs();
    if p >= 1000.0 {
        2
    } else if p >= 100.0 {
        3
    } else if p >= 1.0 {
        4
    } else if p >= 0.01 {
        6
    } else {
        8
    }
}

fn round_price(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        0.0
    }
}

pub fn stop_fraction(volatility_pct: f64) -> f64 {
    let raw = volatility_pct / STOP_VOLATILITY_DIVISOR;
    if !raw.is_finite() {
        return STOP_FRACTION_CEILING;
    }
    raw.max(STOP_FRACTION_FLOOR).min(STOP_FRACTION_CEILING)
}

pub fn trade_levels(price: f64, direction: Direction, volatility_pct: f64) -> TradeLevels {
    let decimals = tick_decimals(price);
    let targets = match direction {
        Direction::Long => LONG_TARGETS,
        Direction::Short => SHORT_TARGETS,
    };
    let stop = price * (1.0 - direction.sign() * stop_fraction(volatility_pct));

    TradeLevels {
        entry: round_price(price, decimals),
        take_profit_1: round_price(price * targets[0], decimals),
        take_profit_2: round_price(price * targets[1], decimals),
        take_profit_3: round_price(price * targets[2], decimals),
        stop_loss: round_price(stop, decimals),
    }
}

/// Suggested leverage range; calmer symbols tolerate more.
pub fn leverage_band(volatility_pct: f64) -> &'static str {
    match volatility_pct {
        v if v < 4.0 => "15-20x",
        v if v < 7.0 => "10-15x",
        v if v < 10.0 => "6-10x",
        v if v < 14.0 => "4-6x",
        _ => "3-4x",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_levels_on_large_price() {
        let l = trade_levels(2_500.0, Direction::Long, 1.0);
        assert_eq!(l.entry, 2_500.0);
        assert_eq!(l.take_profit_1, 2_515.0);
        assert_eq!(l.take_profit_2, 2_530.0);
        assert_eq!(l.take_profit_3, 2_550.0);
        // 1.0% volatility sits below the 1.2% floor
        assert_eq!(l.stop_loss, 2_470.0);
    }

    #[test]
    fn short_levels_mirror_long() {
        let l = trade_levels(2_500.0, Direction::Short, 6.0);
        assert_eq!(l.take_profit_1, 2_485.0);
        assert_eq!(l.take_profit_2, 2_470.0);
        assert_eq!(l.take_profit_3, 2_445.0);
        // 6% volatility is past the 1.4% ceiling
        assert_eq!(l.stop_loss, 2_535.0);
    }

    #[test]
    fn stop_fraction_is_clamped() {
        assert_eq!(stop_fraction(0.0), 0.012);
        assert_eq!(stop_fraction(1.5), 0.012);
        assert!((stop_fraction(1.95) - 0.013).abs() < 1e-12);
        assert_eq!(stop_fraction(2.4), 0.014);
        assert_eq!(stop_fraction(50.0), 0.014);
        assert_eq!(stop_fraction(f64::NAN), 0.014);
    }

    #[test]
    fn tick_precision_by_magnitude() {
        assert_eq!(tick_decimals(65_000.0), 2);
        assert_eq!(tick_decimals(150.0), 3);
        assert_eq!(tick_decimals(1.5), 4);
        assert_eq!(tick_decimals(0.05), 6);
        assert_eq!(tick_decimals(0.000_02), 8);
    }

    #[test]
    fn small_price_keeps_precision() {
        let l = trade_levels(0.123_456_78, Direction::Long, 3.0);
        assert_eq!(l.entry, 0.123_457);
        assert_eq!(l.take_profit_1, 0.124_198);
    }

    #[test]
    fn leverage_bands() {
        assert_eq!(leverage_band(2.0), "15-20x");
        assert_eq!(leverage_band(4.0), "10-15x");
        assert_eq!(leverage_band(9.9), "6-10x");
        assert_eq!(leverage_band(13.0), "4-6x");
        assert_eq!(leverage_band(30.0), "3-4x");
    }
}
