// =============================================================================
// Open Interest — participation delta over a short history window
// =============================================================================
//
// Open Interest (OI) is the total number of outstanding contracts.  The delta
// between the earliest and latest sample of a short window shows whether new
// money is entering (OI rising) or positions are being closed (OI falling).
//
// The provider's ordering is never trusted: samples are sorted by timestamp
// before the delta is taken.

use serde::{Deserialize, Serialize};

/// One sample of the open-interest history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenInterestPoint {
    /// Sample time in milliseconds since the UNIX epoch.
    pub timestamp: i64,
    /// Total open interest in contracts.
    pub open_interest: f64,
    /// Total open interest in quote currency.
    pub open_interest_value: f64,
}

/// Percent change of open interest from the earliest to the latest sample.
///
/// Returns 0.0 with fewer than two samples, a zero starting value, or a
/// non-finite result.
pub fn open_interest_delta_pct(history: &[OpenInterestPoint]) -> f64 {
    if history.len() < 2 {
        return 0.0;
    }

    let mut sorted: Vec<&OpenInterestPoint> = history.iter().collect();
    sorted.sort_by_key(|p| p.timestamp);

    let first = sorted[0].open_interest;
    let last = sorted[sorted.len() - 1].open_interest;
    if first == 0.0 {
        return 0.0;
    }

    let delta = (last - first) / first * 100.0;
    if delta.is_finite() {
        delta
    } else {
        0.0
    }
}
