// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Seed average gain / average loss with the mean of the first
//          `period` gains / losses.
// Step 3 — Apply Wilder's smoothing over the remaining deltas:
//            avg_gain = (prev_avg_gain * (period - 1) + current_gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + current_loss) / period
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Two fixed fallbacks:
//   - not enough closes (len <= period)  =>  50 (neutral)
//   - final average loss exactly zero    =>  80 (capped, never 100)
// =============================================================================

/// Default RSI look-back.
pub const RSI_PERIOD: usize = 14;

/// Returned when there are not enough closes to seed the averages.
pub const RSI_NEUTRAL: f64 = 50.0;

/// Returned when the final average loss is exactly zero.
pub const RSI_NO_LOSS_CAP: f64 = 80.0;

/// Compute the most recent RSI value for `values`.
pub fn rsi(values: &[f64], period: usize) -> f64 {
    if period == 0 || values.len() <= period {
        return RSI_NEUTRAL;
    }

    let deltas: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    let (sum_gain, sum_loss) = deltas[..period]
        .iter()
        .fold((0.0_f64, 0.0_f64), |(g, l), &d| {
            if d > 0.0 {
                (g + d, l)
            } else {
                (g, l - d)
            }
        });

    let period_f = period as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;

    for &delta in &deltas[period..] {
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);
        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;
    }

    if avg_loss == 0.0 {
        return RSI_NO_LOSS_CAP;
    }

    let rs = avg_gain / avg_loss;
    let value = 100.0 - 100.0 / (1.0 + rs);
    if value.is_finite() {
        value
    } else {
        RSI_NEUTRAL
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_insufficient_data_is_neutral() {
        assert_eq!(rsi(&[], RSI_PERIOD), 50.0);
        let closes: Vec<f64> = (1..=14).map(|x| x as f64 * 3.0).collect();
        assert_eq!(rsi(&closes, RSI_PERIOD), 50.0);
    }

    #[test]
    fn rsi_all_gains_is_capped_at_80() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        assert_eq!(rsi(&closes, RSI_PERIOD), 80.0);
    }

    #[test]
    fn rsi_flat_market_hits_zero_loss_cap() {
        // No losses at all, including no gains: the zero-loss rule still applies.
        assert_eq!(rsi(&[100.0; 30], RSI_PERIOD), 80.0);
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        assert!(rsi(&closes, RSI_PERIOD).abs() < 1e-10);
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let v = rsi(&closes, RSI_PERIOD);
        assert!(v > 0.0 && v < 100.0, "RSI {v} out of range");
    }

    #[test]
    fn rsi_mostly_rising_sits_above_midline() {
        let mut closes = vec![100.0];
        for i in 0..60 {
            let step = if i % 3 == 2 { -0.5 } else { 0.5 };
            let last = *closes.last().unwrap();
            closes.push(last + step);
        }
        let v = rsi(&closes, RSI_PERIOD);
        assert!(v > 55.0 && v < 80.0, "got {v}");
    }
}
