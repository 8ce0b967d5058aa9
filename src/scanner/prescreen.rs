// =============================================================================
// Pre-Screener — cheap ticker-only ranking that bounds the deep evaluation
// =============================================================================
//
// Sub-scores (each capped before summation):
//
//   move      = min(|chg%| * 1.5, 35)
//   volume    = min(max(log10(quoteVol) - 6, 0) * 10, 25)
//   range     = min(range% * 1.2, 25)           range% = (high-low)/low*100
//   velocity  = min(|chg%| / range% * 15, 15)   0 when range is 0
//
// Velocity rewards symbols that closed near the extreme of their day rather
// than chopping inside a wide range.
// =============================================================================

use serde::Serialize;

use crate::market_data::TickerSnapshot;

const MOVE_SCALE: f64 = 1.5;
const MOVE_CAP: f64 = 35.0;
const VOLUME_LOG_FLOOR: f64 = 6.0;
const VOLUME_SCALE: f64 = 10.0;
const VOLUME_CAP: f64 = 25.0;
const RANGE_SCALE: f64 = 1.2;
const RANGE_CAP: f64 = 25.0;
const VELOCITY_SCALE: f64 = 15.0;
const VELOCITY_CAP: f64 = 15.0;

/// A ticker that passed the liquidity floor, with its pre-score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenedSymbol {
    pub symbol: String,
    pub last_price: f64,
    pub change_24h: f64,
    pub quote_volume: f64,
    pub pre_score: f64,
}

/// Pre-score for one ticker.
pub fn pre_score(ticker: &TickerSnapshot) -> f64 {
    let change = ticker.price_change_percent.abs();
    let range_pct = ticker.range_percent();

    let move_score = (change * MOVE_SCALE).min(MOVE_CAP);
    let volume_score = if ticker.quote_volume > 0.0 {
        ((ticker.quote_volume.log10() - VOLUME_LOG_FLOOR).max(0.0) * VOLUME_SCALE).min(VOLUME_CAP)
    } else {
        0.0
    };
    let range_score = (range_pct * RANGE_SCALE).min(RANGE_CAP);
    let velocity_score = if range_pct > 0.0 {
        (change / range_pct * VELOCITY_SCALE).min(VELOCITY_CAP)
    } else {
        0.0
    };

    let total = move_score + volume_score + range_score + velocity_score;
    if total.is_finite() {
        total
    } else {
        0.0
    }
}

/// Apply the liquidity floor, score, sort descending (stable) and keep the
/// top `shortlist_size`.
pub fn prescreen(
    tickers: &[TickerSnapshot],
    min_quote_volume: f64,
    shortlist_size: usize,
) -> Vec<ScreenedSymbol> {
    let mut screened: Vec<ScreenedSymbol> = tickers
        .iter()
        .filter(|t| t.quote_volume > min_quote_volume && t.last_price > 0.0)
        .map(|t| ScreenedSymbol {
            symbol: t.symbol.clone(),
            last_price: t.last_price,
            change_24h: t.price_change_percent,
            quote_volume: t.quote_volume,
            pre_score: pre_score(t),
        })
        .collect();

    // sort_by is stable: equal pre-scores keep input order
    screened.sort_by(|a, b| {
        b.pre_score
            .partial_cmp(&a.pre_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    screened.truncate(shortlist_size);
    screened
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker(symbol: &str, change: f64, quote_volume: f64, high: f64, low: f64) -> TickerSnapshot {
        TickerSnapshot {
            symbol: symbol.into(),
            last_price: 10.0,
            price_change_percent: change,
            volume: 1.0,
            quote_volume,
            trade_count: 100,
            high_price: high,
            low_price: low,
            weighted_avg_price: 10.0,
        }
    }

    #[test]
    fn pre_score_components() {
        // move 4.5, volume 10, range 12, velocity 4.5
        let t = ticker("AUSDT", 3.0, 10_000_000.0, 110.0, 100.0);
        assert!((pre_score(&t) - 31.0).abs() < 1e-9);
    }

    #[test]
    fn pre_score_caps() {
        let t = ticker("AUSDT", 80.0, 1e15, 300.0, 100.0);
        // 35 + 25 + 25 + velocity min(80/200*15, 15) = 6
        assert!((pre_score(&t) - 91.0).abs() < 1e-9);
    }

    #[test]
    fn zero_range_has_no_velocity() {
        let t = ticker("AUSDT", 0.0, 1_000_000.0, 100.0, 100.0);
        assert_eq!(pre_score(&t), 0.0);
        let t = ticker("AUSDT", 2.0, 1_000_000.0, 100.0, 0.0);
        assert_eq!(pre_score(&t), 3.0);
    }

    #[test]
    fn liquidity_floor_is_strict() {
        let tickers = vec![
            ticker("THIN", 9.0, 3_000_000.0, 110.0, 100.0),
            ticker("DEEP", 1.0, 3_000_001.0, 110.0, 100.0),
        ];
        let out = prescreen(&tickers, 3_000_000.0, 40);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].symbol, "DEEP");
    }

    #[test]
    fn non_positive_price_is_skipped() {
        let mut t = ticker("DEAD", 5.0, 9e9, 110.0, 100.0);
        t.last_price = 0.0;
        assert!(prescreen(&[t], 3_000_000.0, 40).is_empty());
    }

    #[test]
    fn sorted_truncated_and_stable() {
        let tickers = vec![
            ticker("LOW", 0.5, 5e6, 101.0, 100.0),
            ticker("TIE_A", 4.0, 5e7, 105.0, 100.0),
            ticker("HIGH", 12.0, 5e8, 115.0, 100.0),
            ticker("TIE_B", 4.0, 5e7, 105.0, 100.0),
        ];
        let out = prescreen(&tickers, 3e6, 3);
        let names: Vec<&str> = out.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(names, vec!["HIGH", "TIE_A", "TIE_B"]);
        assert!(out.windows(2).all(|w| w[0].pre_score >= w[1].pre_score));
    }
}
