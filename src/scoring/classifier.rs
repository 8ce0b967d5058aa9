// =============================================================================
// Classifier — direction, breakout detection, movement state
// =============================================================================
//
// Movement state is an ordered rule list evaluated top-down; the first rule
// whose predicate matches wins and `LikelyIn24h` is the fallback:
//
//   1. Moving Now     strong momentum  OR  two-timeframe breakout expansion
//   2. About To Move  aligned momentum AND trend/MACD/RSI agreement
//   3. Likely in 24H  default
//
// Each predicate is a small pure function over the bundle so the thresholds
// can be tested one at a time.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::market_data::CandleSeries;
use crate::scoring::IndicatorBundle;
use crate::types::{Direction, MovementState};

/// Bars used for the rolling high/low.
pub const BREAKOUT_LOOKBACK: usize = 20;
/// Proximity to the rolling extreme that already counts as a breakout.
pub const BREAKOUT_PROXIMITY: f64 = 0.002;

// ── Direction thresholds ─────────────────────────────────────────────────────
const LONG_RSI_FLOOR: f64 = 48.0;
const SHORT_RSI_CEILING: f64 = 52.0;

// ── RSI bias thresholds (1H / 4H) ────────────────────────────────────────────
const RSI_BULL_1H: f64 = 52.0;
const RSI_BEAR_1H: f64 = 48.0;
const RSI_MID_4H: f64 = 50.0;

// ── Moving Now ───────────────────────────────────────────────────────────────
const STRONG_VOLUME_1H: f64 = 1.6;
const STRONG_VOLUME_15M: f64 = 1.4;
const STRONG_CHANGE_24H: f64 = 1.0;
const STRONG_TREND_MIN: f64 = 0.01;
const STRONG_OI_DELTA: f64 = 0.5;
const EXPANSION_VOLATILITY: f64 = 2.5;

// ── About To Move ────────────────────────────────────────────────────────────
const MODERATE_VOLUME_1H: f64 = 1.2;
const FINE_VOLUME_15M: f64 = 1.5;
const FINE_OI_DELTA: f64 = 0.3;

// =============================================================================
// Breakout detection
// =============================================================================

/// Price position relative to the recent rolling high/low on one timeframe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakoutState {
    /// Within 0.2% of, or above, the rolling high.
    pub up: bool,
    /// Within 0.2% of, or below, the rolling low.
    pub down: bool,
}

impl BreakoutState {
    /// Detect against the last `BREAKOUT_LOOKBACK` bars (or all bars when
    /// fewer).  Empty input yields no breakout.
    pub fn detect(highs: &[f64], lows: &[f64], price: f64) -> Self {
        let start_h = highs.len().saturating_sub(BREAKOUT_LOOKBACK);
        let start_l = lows.len().saturating_sub(BREAKOUT_LOOKBACK);
        let window_high = highs[start_h..].iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let window_low = lows[start_l..].iter().copied().fold(f64::INFINITY, f64::min);

        Self {
            up: window_high.is_finite() && price >= window_high * (1.0 - BREAKOUT_PROXIMITY),
            down: window_low.is_finite() && price <= window_low * (1.0 + BREAKOUT_PROXIMITY),
        }
    }

    pub fn from_series(series: &CandleSeries) -> Self {
        match series.last_close() {
            Some(price) => Self::detect(&series.highs(), &series.lows(), price),
            None => Self::default(),
        }
    }

    /// Breakout on the side matching `direction`.
    pub fn confirms(self, direction: Direction) -> bool {
        match direction {
            Direction::Long => self.up,
            Direction::Short => self.down,
        }
    }
}

// =============================================================================
// Direction
// =============================================================================

/// Long when both trends are non-negative and 1H RSI >= 48; Short when both
/// are non-positive and 1H RSI <= 52; otherwise the timeframe with the larger
/// absolute trend decides (ties go Long).
pub fn direction(bundle: &IndicatorBundle) -> Direction {
    let (t1, t4) = (bundle.trend_1h, bundle.trend_4h);

    if t1 >= 0.0 && t4 >= 0.0 && bundle.rsi_1h >= LONG_RSI_FLOOR {
        return Direction::Long;
    }
    if t1 <= 0.0 && t4 <= 0.0 && bundle.rsi_1h <= SHORT_RSI_CEILING {
        return Direction::Short;
    }

    let dominant = if t1.abs() >= t4.abs() { t1 } else { t4 };
    if dominant >= 0.0 {
        Direction::Long
    } else {
        Direction::Short
    }
}

// =============================================================================
// Predicates
// =============================================================================

/// Both trend scores strictly on the same side of zero.
pub fn trend_signs_agree(bundle: &IndicatorBundle) -> bool {
    bundle.trend_1h * bundle.trend_4h > 0.0
}

/// Both MACD histograms strictly on the same side of zero.
pub fn histogram_signs_agree(bundle: &IndicatorBundle) -> bool {
    bundle.macd_1h.histogram * bundle.macd_4h.histogram > 0.0
}

/// Direction implied by RSI on both timeframes, if they agree.
pub fn rsi_bias(bundle: &IndicatorBundle) -> Option<Direction> {
    if bundle.rsi_1h > RSI_BULL_1H && bundle.rsi_4h > RSI_MID_4H {
        Some(Direction::Long)
    } else if bundle.rsi_1h < RSI_BEAR_1H && bundle.rsi_4h < RSI_MID_4H {
        Some(Direction::Short)
    } else {
        None
    }
}

pub fn trend_aligned(bundle: &IndicatorBundle, direction: Direction) -> bool {
    direction.agrees_with(bundle.trend_1h) && direction.agrees_with(bundle.trend_4h)
}

pub fn histogram_aligned(bundle: &IndicatorBundle, direction: Direction) -> bool {
    direction.agrees_with(bundle.macd_1h.histogram) && direction.agrees_with(bundle.macd_4h.histogram)
}

pub fn rsi_aligned(bundle: &IndicatorBundle, direction: Direction) -> bool {
    rsi_bias(bundle) == Some(direction)
}

/// Volume on both timeframes, a real 24h move, agreeing histograms, non-trivial
/// trends and an open-interest shift.
pub fn strong_momentum(bundle: &IndicatorBundle, change_24h: f64) -> bool {
    bundle.volume_ratio_1h > STRONG_VOLUME_1H
        && bundle.volume_ratio_15m > STRONG_VOLUME_15M
        && change_24h.abs() > STRONG_CHANGE_24H
        && histogram_signs_agree(bundle)
        && bundle.trend_1h.abs() > STRONG_TREND_MIN
        && bundle.trend_4h.abs() > STRONG_TREND_MIN
        && bundle.oi_delta_pct.abs() > STRONG_OI_DELTA
}

/// Breakout on both timeframes in the trade direction with expanding volatility.
pub fn breakout_expansion(bundle: &IndicatorBundle, direction: Direction) -> bool {
    bundle.breakout_1h.confirms(direction)
        && bundle.breakout_4h.confirms(direction)
        && bundle.volatility_pct > EXPANSION_VOLATILITY
}

/// Moderate 1H volume backed by trend or MACD, or a 15m volume burst backed
/// by open interest.
pub fn aligned_momentum(bundle: &IndicatorBundle, direction: Direction) -> bool {
    let moderate_volume = bundle.volume_ratio_1h > MODERATE_VOLUME_1H
        && (direction.agrees_with(bundle.trend_1h) || direction.agrees_with(bundle.macd_1h.histogram));
    let fine_volume =
        bundle.volume_ratio_15m > FINE_VOLUME_15M && bundle.oi_delta_pct.abs() > FINE_OI_DELTA;
    moderate_volume || fine_volume
}

// =============================================================================
// Rule list
// =============================================================================

/// Everything a movement-state rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub bundle: &'a IndicatorBundle,
    pub direction: Direction,
    pub change_24h: f64,
}

struct Rule {
    state: MovementState,
    matches: fn(&RuleContext<'_>) -> bool,
}

fn moving_now(ctx: &RuleContext<'_>) -> bool {
    strong_momentum(ctx.bundle, ctx.change_24h) || breakout_expansion(ctx.bundle, ctx.direction)
}

fn about_to_move(ctx: &RuleContext<'_>) -> bool {
    aligned_momentum(ctx.bundle, ctx.direction)
        && trend_signs_agree(ctx.bundle)
        && histogram_signs_agree(ctx.bundle)
        && rsi_bias(ctx.bundle).is_some()
}

const RULES: [Rule; 2] = [
    Rule {
        state: MovementState::MovingNow,
        matches: moving_now,
    },
    Rule {
        state: MovementState::AboutToMove,
        matches: about_to_move,
    },
];

/// First matching rule wins; `LikelyIn24h` otherwise.
pub fn classify(ctx: &RuleContext<'_>) -> MovementState {
    RULES
        .iter()
        .find(|rule| (rule.matches)(ctx))
        .map(|rule| rule.state)
        .unwrap_or(MovementState::LikelyIn24h)
}
