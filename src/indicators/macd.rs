// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   macd line   = EMA(fast) - EMA(slow)           (pointwise, full series)
//   signal line = EMA(macd line[slow-1..], signal)
//   histogram   = macd - signal                    (last element of each)
//
// Below `slow + signal` samples the triple is all zero.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::ema::ema;

pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

/// Last values of the MACD line, its signal line, and their difference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macd {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Compute the MACD triple with explicit periods.
pub fn macd_with(values: &[f64], fast: usize, slow: usize, signal: usize) -> Macd {
    if slow == 0 || values.len() < slow + signal {
        return Macd::default();
    }

    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);
    let line: Vec<f64> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| f - s)
        .collect();

    let signal_series = ema(&line[slow - 1..], signal);

    let (Some(&macd), Some(&signal)) = (line.last(), signal_series.last()) else {
        return Macd::default();
    };

    let out = Macd {
        macd,
        signal,
        histogram: macd - signal,
    };
    if out.macd.is_finite() && out.signal.is_finite() {
        out
    } else {
        Macd::default()
    }
}

/// MACD(12, 26, 9).
pub fn macd(values: &[f64]) -> Macd {
    macd_with(values, MACD_FAST, MACD_SLOW, MACD_SIGNAL)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_below_minimum_is_zero() {
        let closes: Vec<f64> = (1..=34).map(|x| x as f64).collect();
        assert_eq!(macd(&closes), Macd::default());
        assert_eq!(macd(&[]), Macd::default());
    }

    #[test]
    fn macd_at_minimum_is_computed() {
        let closes: Vec<f64> = (1..=35).map(|x| x as f64).collect();
        let m = macd(&closes);
        assert!(m.macd > 0.0);
    }

    #[test]
    fn macd_histogram_is_difference() {
        let closes: Vec<f64> = (0..120).map(|i| 100.0 + (i as f64 * 0.3).sin() * 4.0).collect();
        let m = macd(&closes);
        assert!((m.histogram - (m.macd - m.signal)).abs() < 1e-12);
    }

    #[test]
    fn macd_signal_starts_at_slow_minus_one() {
        let closes: Vec<f64> = (1..=60).map(|x| (x * x) as f64).collect();
        let line: Vec<f64> = ema(&closes, 12)
            .iter()
            .zip(ema(&closes, 26).iter())
            .map(|(f, s)| f - s)
            .collect();
        let expected_signal = *ema(&line[25..], 9).last().unwrap();
        let m = macd(&closes);
        assert!((m.signal - expected_signal).abs() < 1e-9);
        assert!((m.macd - line[59]).abs() < 1e-9);
    }

    #[test]
    fn macd_downtrend_is_negative() {
        let closes: Vec<f64> = (1..=100).rev().map(|x| x as f64).collect();
        assert!(macd(&closes).macd < 0.0);
    }
}
