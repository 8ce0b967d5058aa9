// =============================================================================
// Scanner Configuration — tunables for the scan pass and the service loop
// =============================================================================
//
// Loaded from `scanner_config.json` at startup; any missing field falls back
// to its serde default so older files keep loading.  A handful of
// deployment-level settings can be overridden from the environment:
//
//   RADAR_BIND_ADDR            HTTP listen address
//   RADAR_SCAN_INTERVAL_SECS   seconds between scheduled passes
//   RADAR_MAX_CONCURRENCY      in-flight symbol evaluations
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.
// =============================================================================

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::binance::DEFAULT_BASE_URL;
use crate::scanner::evaluator::MIN_TREND_BARS;

pub const ENV_BIND_ADDR: &str = "RADAR_BIND_ADDR";
pub const ENV_SCAN_INTERVAL: &str = "RADAR_SCAN_INTERVAL_SECS";
pub const ENV_MAX_CONCURRENCY: &str = "RADAR_MAX_CONCURRENCY";

/// Upper bound for `max_concurrent_evaluations`.
pub const MAX_CONCURRENCY_LIMIT: usize = 64;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_min_quote_volume() -> f64 {
    3_000_000.0
}

fn default_shortlist_size() -> usize {
    40
}

fn default_max_concurrent_evaluations() -> usize {
    6
}

fn default_trend_kline_limit() -> u32 {
    180
}

fn default_confirm_kline_limit() -> u32 {
    120
}

fn default_oi_period() -> String {
    "15m".to_string()
}

fn default_oi_history_limit() -> u32 {
    5
}

fn default_min_score() -> f64 {
    55.0
}

fn default_movers_count() -> usize {
    5
}

fn default_strongest_count() -> usize {
    3
}

fn default_scan_interval_secs() -> u64 {
    60
}

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

// =============================================================================
// ScannerConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Futures REST base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    // --- Pre-screen ----------------------------------------------------------

    /// 24h quote volume a ticker must exceed (strictly).
    #[serde(default = "default_min_quote_volume")]
    pub min_quote_volume: f64,

    #[serde(default = "default_shortlist_size")]
    pub shortlist_size: usize,

    // --- Deep evaluation -----------------------------------------------------

    #[serde(default = "default_max_concurrent_evaluations")]
    pub max_concurrent_evaluations: usize,

    /// Bars requested for the 1h and 4h trend series.
    #[serde(default = "default_trend_kline_limit")]
    pub trend_kline_limit: u32,

    /// Bars requested for the 15m confirmation series.
    #[serde(default = "default_confirm_kline_limit")]
    pub confirm_kline_limit: u32,

    #[serde(default = "default_oi_period")]
    pub oi_period: String,

    #[serde(default = "default_oi_history_limit")]
    pub oi_history_limit: u32,

    // --- Ranking -------------------------------------------------------------

    #[serde(default = "default_min_score")]
    pub min_score: f64,

    #[serde(default = "default_movers_count")]
    pub movers_count: usize,

    #[serde(default = "default_strongest_count")]
    pub strongest_count: usize,

    // --- Service -------------------------------------------------------------

    #[serde(default = "default_scan_interval_secs")]
    pub scan_interval_secs: u64,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            min_quote_volume: default_min_quote_volume(),
            shortlist_size: default_shortlist_size(),
            max_concurrent_evaluations: default_max_concurrent_evaluations(),
            trend_kline_limit: default_trend_kline_limit(),
            confirm_kline_limit: default_confirm_kline_limit(),
            oi_period: default_oi_period(),
            oi_history_limit: default_oi_history_limit(),
            min_score: default_min_score(),
            movers_count: default_movers_count(),
            strongest_count: default_strongest_count(),
            scan_interval_secs: default_scan_interval_secs(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl ScannerConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing or unparsable file is an error so the caller can fall back
    /// to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scanner config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse scanner config from {}", path.display()))?;
        config.validate()?;

        info!(
            path = %path.display(),
            shortlist = config.shortlist_size,
            concurrency = config.max_concurrent_evaluations,
            min_score = config.min_score,
            "scanner config loaded"
        );

        Ok(config)
    }

    /// Load `path`, falling back to defaults with a warning.  A missing file
    /// is seeded with the defaults; an unreadable or invalid one is left as is.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %format!("{e:#}"), "Failed to load config, using defaults");
                let config = Self::default();
                if !path.exists() {
                    if let Err(e) = config.save(path) {
                        warn!(error = %e, "Failed to write default config");
                    }
                }
                config
            }
        }
    }

    /// Persist to `path` using an atomic write (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise scanner config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "scanner config saved (atomic)");
        Ok(())
    }

    /// Reject settings that would make a pass meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.shortlist_size == 0 {
            bail!("shortlist_size must be at least 1");
        }
        if self.max_concurrent_evaluations == 0
            || self.max_concurrent_evaluations > MAX_CONCURRENCY_LIMIT
        {
            bail!(
                "max_concurrent_evaluations must be between 1 and {}",
                MAX_CONCURRENCY_LIMIT
            );
        }
        if (self.trend_kline_limit as usize) < MIN_TREND_BARS {
            bail!(
                "trend_kline_limit {} is below the {} bars scoring needs",
                self.trend_kline_limit,
                MIN_TREND_BARS
            );
        }
        if !self.min_quote_volume.is_finite() || self.min_quote_volume < 0.0 {
            bail!("min_quote_volume must be a non-negative number");
        }
        if self.scan_interval_secs == 0 {
            bail!("scan_interval_secs must be at least 1");
        }
        Ok(())
    }

    /// Apply `RADAR_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup.  Unparsable values are ignored
    /// with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup(ENV_BIND_ADDR) {
            let addr = addr.trim();
            if !addr.is_empty() {
                self.bind_addr = addr.to_string();
            }
        }

        if let Some(raw) = lookup(ENV_SCAN_INTERVAL) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.scan_interval_secs = secs,
                _ => warn!(key = ENV_SCAN_INTERVAL, value = %raw, "ignoring invalid override"),
            }
        }

        if let Some(raw) = lookup(ENV_MAX_CONCURRENCY) {
            match raw.trim().parse::<usize>() {
                Ok(n) if (1..=MAX_CONCURRENCY_LIMIT).contains(&n) => {
                    self.max_concurrent_evaluations = n
                }
                _ => warn!(key = ENV_MAX_CONCURRENCY, value = %raw, "ignoring invalid override"),
            }
        }
    }
}
