// =============================================================================
// Rate-Limit Tracker — watches USDⓈ-M futures request weight
// =============================================================================
//
// The futures REST API allows 2400 request weight per minute per IP.  A full
// scan pass costs roughly:
//
//   exchangeInfo 1 + ticker/24hr 40 + shortlist * (3 klines * 2..5 + 1 + 1)
//
// The tracker reads `X-MBX-USED-WEIGHT-1M` after every response, keeps the
// latest value in an atomic and warns once usage crosses 1800.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, warn};

pub const WEIGHT_BUDGET_1M: u32 = 2400;
pub const WEIGHT_WARN_THRESHOLD: u32 = 1800;

const USED_WEIGHT_HEADER: &str = "x-mbx-used-weight-1m";

/// Lock-free tracker of the last reported request weight.
pub struct RateLimitTracker {
    used_weight_1m: AtomicU32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSnapshot {
    pub used_weight_1m: u32,
    pub budget_1m: u32,
    /// At or above the warning threshold.
    pub hot: bool,
}

impl RateLimitTracker {
    pub fn new() -> Self {
        Self {
            used_weight_1m: AtomicU32::new(0),
        }
    }

    /// Record the weight reported in a response's headers, if present.
    pub fn update_from_headers(&self, headers: &reqwest::header::HeaderMap) {
        let Some(weight) = headers
            .get(USED_WEIGHT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u32>().ok())
        else {
            return;
        };
        self.record(weight);
    }

    pub fn record(&self, weight: u32) {
        let prev = self.used_weight_1m.swap(weight, Ordering::Relaxed);
        if weight >= WEIGHT_WARN_THRESHOLD && prev < WEIGHT_WARN_THRESHOLD {
            warn!(
                used_weight = weight,
                budget = WEIGHT_BUDGET_1M,
                "request weight crossed warning threshold"
            );
        }
        debug!(used_weight_1m = weight, "request weight updated");
    }

    pub fn used_weight(&self) -> u32 {
        self.used_weight_1m.load(Ordering::Relaxed)
    }

    /// Whether the last reported usage is above the warning threshold.
    pub fn is_hot(&self) -> bool {
        self.used_weight() >= WEIGHT_WARN_THRESHOLD
    }

    pub fn snapshot(&self) -> RateLimitSnapshot {
        RateLimitSnapshot {
            used_weight_1m: self.used_weight(),
            budget_1m: WEIGHT_BUDGET_1M,
            hot: self.is_hot(),
        }
    }
}

impl Default for RateLimitTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RateLimitTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitTracker")
            .field("used_weight_1m", &self.used_weight())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};

    #[test]
    fn reads_weight_header() {
        let tracker = RateLimitTracker::new();
        let mut headers = HeaderMap::new();
        headers.insert(USED_WEIGHT_HEADER, HeaderValue::from_static("412"));
        tracker.update_from_headers(&headers);
        assert_eq!(tracker.used_weight(), 412);
        assert!(!tracker.is_hot());
    }

    #[test]
    fn ignores_missing_or_garbage_header() {
        let tracker = RateLimitTracker::new();
        tracker.record(77);
        tracker.update_from_headers(&HeaderMap::new());
        let mut headers = HeaderMap::new();
        headers.insert(USED_WEIGHT_HEADER, HeaderValue::from_static("lots"));
        tracker.update_from_headers(&headers);
        assert_eq!(tracker.used_weight(), 77);
    }

    #[test]
    fn hot_above_threshold() {
        let tracker = RateLimitTracker::default();
        tracker.record(1800);
        assert!(tracker.is_hot());
        let snap = tracker.snapshot();
        assert_eq!(snap.used_weight_1m, 1800);
        assert_eq!(snap.budget_1m, 2400);
        assert!(snap.hot);
    }
}
