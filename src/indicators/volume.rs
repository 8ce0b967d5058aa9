// =============================================================================
// Volume Spike Ratio
// =============================================================================
//
// ratio = latest volume / mean(previous `lookback` volumes)
//
// The window is the `lookback + 1` most recent samples (or fewer when the
// series is shorter).  Every degenerate case maps to the neutral ratio 1.0.

/// Default number of bars the latest volume is compared against.
pub const VOLUME_LOOKBACK: usize = 20;

pub fn volume_spike_ratio(volumes: &[f64], lookback: usize) -> f64 {
    let start = volumes.len().saturating_sub(lookback + 1);
    let window = &volumes[start..];

    if window.len() < 2 {
        return 1.0;
    }

    let (prior, latest) = window.split_at(window.len() - 1);
    let mean = prior.iter().sum::<f64>() / prior.len() as f64;
    if mean == 0.0 {
        return 1.0;
    }

    let ratio = latest[0] / mean;
    if ratio.is_finite() {
        ratio
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_on_degenerate_input() {
        assert_eq!(volume_spike_ratio(&[], VOLUME_LOOKBACK), 1.0);
        assert_eq!(volume_spike_ratio(&[500.0], VOLUME_LOOKBACK), 1.0);
        assert_eq!(volume_spike_ratio(&[0.0, 0.0, 0.0, 900.0], VOLUME_LOOKBACK), 1.0);
    }

    #[test]
    fn ratio_against_trailing_mean() {
        let mut vols = vec![1000.0; 20];
        vols.push(1800.0);
        assert!((volume_spike_ratio(&vols, VOLUME_LOOKBACK) - 1.8).abs() < 1e-12);
    }

    #[test]
    fn only_the_window_is_considered() {
        // Ancient huge bars fall outside the 21-sample window.
        let mut vols = vec![1_000_000.0; 30];
        vols.extend(std::iter::repeat(100.0).take(20));
        vols.push(250.0);
        assert!((volume_spike_ratio(&vols, VOLUME_LOOKBACK) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn short_series_uses_what_is_there() {
        assert!((volume_spike_ratio(&[10.0, 30.0], VOLUME_LOOKBACK) - 3.0).abs() < 1e-12);
    }
}
