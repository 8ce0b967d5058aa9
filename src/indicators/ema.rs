// =============================================================================
// Exponential Moving Average (EMA) + EMA trend divergence
// =============================================================================
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The series is seeded with the first raw value, not an SMA of the first
// `period` closes.  Scoring thresholds downstream were tuned against this
// seeding, so early-window values intentionally differ from textbook EMA.
// =============================================================================

/// Fast EMA period used for the trend divergence score.
pub const TREND_FAST_PERIOD: usize = 20;
/// Slow EMA period used for the trend divergence score.
pub const TREND_SLOW_PERIOD: usize = 50;

/// Compute the EMA series for `values` with look-back `period`.
///
/// The output has the same length as the input; element 0 equals
/// `values[0]`.  Empty input yields an empty vec.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };

    let k = 2.0 / (period as f64 + 1.0);

    let mut result = Vec::with_capacity(values.len());
    result.push(first);

    let mut prev = first;
    for &value in &values[1..] {
        let next = value * k + prev * (1.0 - k);
        result.push(next);
        prev = next;
    }

    result
}

/// Percent divergence of the fast EMA from the slow EMA at the last bar:
/// `(emaFast - emaSlow) / emaSlow * 100`.
///
/// Positive means the short average sits above the long one (uptrend).
/// Returns 0.0 for empty input, a zero slow EMA, or a non-finite result.
pub fn ema_trend_score(closes: &[f64], fast: usize, slow: usize) -> f64 {
    let fast_last = ema(closes, fast).last().copied();
    let slow_last = ema(closes, slow).last().copied();

    let (Some(f), Some(s)) = (fast_last, slow_last) else {
        return 0.0;
    };
    if s == 0.0 {
        return 0.0;
    }

    let score = (f - s) / s * 100.0;
    if score.is_finite() {
        score
    } else {
        0.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn ascending(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    // ---- ema -------------------------------------------------------------

    #[test]
    fn ema_empty_input() {
        assert!(ema(&[], 5).is_empty());
        assert!(ema(&[], 0).is_empty());
    }

    #[test]
    fn ema_single_value_is_identity() {
        assert_eq!(ema(&[42.5], 9), vec![42.5]);
    }

    #[test]
    fn ema_preserves_length() {
        let closes = ascending(37);
        assert_eq!(ema(&closes, 12).len(), 37);
    }

    #[test]
    fn ema_seeds_with_first_value() {
        // 3-period EMA: k = 0.5
        let out = ema(&[2.0, 4.0, 6.0], 3);
        assert!((out[0] - 2.0).abs() < 1e-12);
        assert!((out[1] - 3.0).abs() < 1e-12);
        assert!((out[2] - 4.5).abs() < 1e-12);
    }

    #[test]
    fn ema_constant_series_stays_constant() {
        let out = ema(&[7.0; 50], 21);
        assert!(out.iter().all(|v| (v - 7.0).abs() < 1e-12));
    }

    // ---- ema_trend_score -------------------------------------------------

    #[test]
    fn trend_score_positive_for_uptrend() {
        let score = ema_trend_score(&ascending(200), TREND_FAST_PERIOD, TREND_SLOW_PERIOD);
        assert!(score > 0.0);
    }

    #[test]
    fn trend_score_negative_for_downtrend() {
        let closes: Vec<f64> = (1..=200).rev().map(|x| x as f64).collect();
        let score = ema_trend_score(&closes, TREND_FAST_PERIOD, TREND_SLOW_PERIOD);
        assert!(score < 0.0);
    }

    #[test]
    fn trend_score_flat_is_zero() {
        let score = ema_trend_score(&[100.0; 80], TREND_FAST_PERIOD, TREND_SLOW_PERIOD);
        assert!(score.abs() < 1e-12);
    }

    #[test]
    fn trend_score_degenerate_inputs() {
        assert_eq!(ema_trend_score(&[], 20, 50), 0.0);
        assert_eq!(ema_trend_score(&[0.0; 10], 20, 50), 0.0);
    }
}
