// =============================================================================
// Central Application State — momentum radar service
// =============================================================================
//
// Holds the scanner and the outcome of the most recent pass.  The scheduled
// loop and `POST /api/v1/scan` both go through `run_and_record`, which
// serialises passes so two never overlap against the same rate budget.
//
// Thread safety:
//   - Atomic counter for lock-free version tracking.
//   - parking_lot::RwLock for the latest outcome and the error ring.
//   - tokio Mutex held across the pass itself (it spans awaits).
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{error, info};

use crate::binance::{RateLimitSnapshot, RateLimitTracker};
use crate::runtime_config::ScannerConfig;
use crate::scanner::{ScanResult, Scanner};

/// Maximum number of recent errors to retain.
const MAX_RECENT_ERRORS: usize = 50;

/// A recorded failed pass.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub message: String,
    /// ISO 8601 timestamp.
    pub at: String,
}

/// What the last pass produced.
#[derive(Debug, Clone)]
pub enum LatestScan {
    /// No pass has finished yet.
    Pending,
    Completed(ScanResult),
    Failed(ErrorRecord),
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthSnapshot {
    pub status: &'static str,
    pub state_version: u64,
    pub server_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_scan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<ErrorRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitSnapshot>,
    /// Oldest first, at most `MAX_RECENT_ERRORS`.
    pub recent_errors: Vec<ErrorRecord>,
    pub scan_interval_secs: u64,
}

/// Shared across the scan loop and HTTP handlers via `Arc<AppState>`.
pub struct AppState {
    /// Bumped after every recorded pass, success or failure.
    pub state_version: AtomicU64,

    pub config: ScannerConfig,
    scanner: Scanner,
    rate_limit: Option<Arc<RateLimitTracker>>,

    latest: RwLock<LatestScan>,
    recent_errors: RwLock<Vec<ErrorRecord>>,
    pass_lock: tokio::sync::Mutex<()>,
}

impl AppState {
    pub fn new(scanner: Scanner, rate_limit: Option<Arc<RateLimitTracker>>) -> Self {
        Self {
            state_version: AtomicU64::new(0),
            config: scanner.config().clone(),
            scanner,
            rate_limit,
            latest: RwLock::new(LatestScan::Pending),
            recent_errors: RwLock::new(Vec::new()),
            pass_lock: tokio::sync::Mutex::new(()),
        }
    }

    // ── Version Management ──────────────────────────────────────────────

    pub fn increment_version(&self) -> u64 {
        self.state_version.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    // ── Scan passes ─────────────────────────────────────────────────────

    /// Run one pass (always with the full list, so any caller can be served
    /// from the stored result) and record its outcome.
    pub async fn run_and_record(&self) -> Result<ScanResult> {
        let _guard = self.pass_lock.lock().await;

        match self.scanner.run_pass(true).await {
            Ok(result) => {
                self.record_success(result.clone());
                Ok(result)
            }
            Err(e) => {
                self.record_failure(format!("{e:#}"));
                Err(e)
            }
        }
    }

    pub fn record_success(&self, result: ScanResult) {
        info!(scan_id = %result.scan_id, movers = result.movers.len(), "scan result stored");
        *self.latest.write() = LatestScan::Completed(result);
        self.increment_version();
    }

    pub fn record_failure(&self, message: String) {
        error!(error = %message, "scan pass failed");
        let record = ErrorRecord {
            message,
            at: Utc::now().to_rfc3339(),
        };

        {
            let mut errors = self.recent_errors.write();
            errors.push(record.clone());
            while errors.len() > MAX_RECENT_ERRORS {
                errors.remove(0);
            }
        }

        *self.latest.write() = LatestScan::Failed(record);
        self.increment_version();
    }

    pub fn latest(&self) -> LatestScan {
        self.latest.read().clone()
    }

    pub fn recent_errors(&self) -> Vec<ErrorRecord> {
        self.recent_errors.read().clone()
    }

    // ── Snapshot Builder ────────────────────────────────────────────────

    pub fn health(&self) -> HealthSnapshot {
        let (status, last_scan_id, last_error) = match &*self.latest.read() {
            LatestScan::Pending => ("starting", None, None),
            LatestScan::Completed(r) => ("ok", Some(r.scan_id.clone()), None),
            LatestScan::Failed(e) => ("degraded", None, Some(e.clone())),
        };

        HealthSnapshot {
            status,
            state_version: self.current_state_version(),
            server_time: Utc::now().timestamp_millis(),
            last_scan_id,
            last_error,
            rate_limit: self.rate_limit.as_ref().map(|r| r.snapshot()),
            recent_errors: self.recent_errors(),
            scan_interval_secs: self.config.scan_interval_secs,
        }
    }
}
