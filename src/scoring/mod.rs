// =============================================================================
// Scoring Module
// =============================================================================
//
// Stateless pipeline from an indicator bundle to a fully explained verdict:
//
//   1. Bundle      — RSI / MACD / EMA trend / volume / volatility / OI / funding
//   2. Classifier  — direction, breakout state, movement state
//   3. Composite   — capped additive momentum score, risk score, confidence
//   4. Levels      — entry, take-profits, stop, leverage band
//   5. Explain     — reason and descriptor strings

pub mod bundle;
pub mod classifier;
pub mod composite;
pub mod explain;
pub mod levels;

pub use bundle::{BundleInputs, IndicatorBundle};
pub use classifier::BreakoutState;

use serde::Serialize;

use crate::types::{Confidence, Direction, MovementState};

/// Final per-symbol verdict returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedSymbol {
    pub symbol: String,
    pub last_price: f64,
    pub change_24h: f64,
    pub movement_state: MovementState,
    pub direction: Direction,
    pub composite_score: f64,
    pub risk_score: f64,
    pub confidence: Confidence,
    pub entry: f64,
    pub take_profit_1: f64,
    pub take_profit_2: f64,
    pub take_profit_3: f64,
    pub stop_loss: f64,
    pub leverage: String,
    pub reason: String,
    pub trend_strength: String,
    pub breakout_signal: String,
    pub whale_activity: String,
    pub volatility: String,
}

/// Score one symbol.  `price` is the last 1H close.
pub fn score_symbol(
    symbol: &str,
    bundle: &IndicatorBundle,
    change_24h: f64,
    price: f64,
) -> EvaluatedSymbol {
    let direction = classifier::direction(bundle);
    let movement_state = classifier::classify(&classifier::RuleContext {
        bundle,
        direction,
        change_24h,
    });

    let composite_score = composite::composite_score(bundle, direction, price);
    let risk_score = composite::risk_score(bundle);
    let levels = levels::trade_levels(price, direction, bundle.volatility_pct);

    EvaluatedSymbol {
        symbol: symbol.to_string(),
        last_price: price,
        change_24h,
        movement_state,
        direction,
        composite_score,
        risk_score,
        confidence: composite::confidence(composite_score, risk_score),
        entry: levels.entry,
        take_profit_1: levels.take_profit_1,
        take_profit_2: levels.take_profit_2,
        take_profit_3: levels.take_profit_3,
        stop_loss: levels.stop_loss,
        leverage: levels::leverage_band(bundle.volatility_pct).to_string(),
        reason: explain::reason(bundle, direction),
        trend_strength: explain::trend_strength(bundle),
        breakout_signal: explain::breakout_signal(bundle, direction),
        whale_activity: explain::whale_activity(bundle),
        volatility: explain::volatility_label(bundle.volatility_pct),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::Macd;

    fn bullish() -> IndicatorBundle {
        IndicatorBundle {
            rsi_1h: 66.0,
            rsi_4h: 61.0,
            macd_1h: Macd { macd: 0.5, signal: 0.3, histogram: 0.2 },
            macd_4h: Macd { macd: 1.1, signal: 0.6, histogram: 0.5 },
            trend_1h: 2.4,
            trend_4h: 4.8,
            volume_ratio_1h: 1.8,
            volume_ratio_15m: 1.8,
            volatility_pct: 6.3,
            oi_delta_pct: 2.0,
            funding_rate_pct: 0.01,
            breakout_1h: BreakoutState { up: true, down: false },
            breakout_4h: BreakoutState { up: true, down: false },
        }
    }

    #[test]
    fn scoring_is_deterministic() {
        let b = bullish();
        let first = score_symbol("ETHUSDT", &b, 3.2, 125.0);
        let second = score_symbol("ETHUSDT", &b, 3.2, 125.0);
        assert_eq!(first, second);
    }

    #[test]
    fn bullish_bundle_yields_long_moving_now() {
        let s = score_symbol("ETHUSDT", &bullish(), 3.2, 125.0);
        assert_eq!(s.direction, Direction::Long);
        assert_eq!(s.movement_state, MovementState::MovingNow);
        assert!(s.composite_score > 70.0);
        assert!(s.confidence >= Confidence::Medium);
        assert!(s.take_profit_1 > s.entry && s.stop_loss < s.entry);
        assert_eq!(s.leverage, "10-15x");
        assert!(s.reason.starts_with("Long setup: "));
    }

    #[test]
    fn serialises_labels() {
        let s = score_symbol("ETHUSDT", &bullish(), 3.2, 125.0);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["movement_state"], "Moving Now");
        assert_eq!(json["direction"], "Long");
        assert_eq!(json["symbol"], "ETHUSDT");
    }
}
