// =============================================================================
// Dispersion — population standard deviation and return volatility
// =============================================================================

/// Population standard deviation (divides by N).  Empty input yields 0.
pub fn standard_deviation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Standard deviation of simple returns, scaled by `sqrt(returns.len())`,
/// expressed in percent.
///
/// Fewer than two closes yields 0.  Returns against a zero previous close
/// are skipped.
pub fn volatility_percent(closes: &[f64]) -> f64 {
    if closes.len() < 2 {
        return 0.0;
    }

    let returns: Vec<f64> = closes
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .filter(|r| r.is_finite())
        .collect();

    if returns.is_empty() {
        return 0.0;
    }

    let vol = standard_deviation(&returns) * (returns.len() as f64).sqrt() * 100.0;
    if vol.is_finite() {
        vol
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_of_constant_is_zero() {
        assert_eq!(standard_deviation(&[3.3; 12]), 0.0);
    }

    #[test]
    fn std_uses_population_divisor() {
        assert!((standard_deviation(&[0.0, 10.0]) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn std_empty_is_zero() {
        assert_eq!(standard_deviation(&[]), 0.0);
    }

    #[test]
    fn volatility_needs_two_closes() {
        assert_eq!(volatility_percent(&[]), 0.0);
        assert_eq!(volatility_percent(&[100.0]), 0.0);
    }

    #[test]
    fn volatility_is_scale_invariant() {
        let pattern = [0.01, -0.02, 0.015, 0.003, -0.007, 0.02];
        let build = |base: f64| {
            let mut closes = vec![base];
            for r in pattern {
                let last = *closes.last().unwrap();
                closes.push(last * (1.0 + r));
            }
            closes
        };
        let cheap = volatility_percent(&build(0.05));
        let dear = volatility_percent(&build(64_000.0));
        assert!(cheap > 0.0);
        assert!((cheap - dear).abs() < 1e-9, "{cheap} vs {dear}");
    }

    #[test]
    fn volatility_of_constant_returns_is_zero() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        assert!(volatility_percent(&closes) < 1e-9);
    }

    #[test]
    fn volatility_skips_zero_previous_close() {
        let v = volatility_percent(&[0.0, 1.0, 1.1, 1.0]);
        assert!(v.is_finite());
        assert!(v > 0.0);
    }
}
