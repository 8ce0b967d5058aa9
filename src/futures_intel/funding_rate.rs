// =============================================================================
// Funding Rate — mark/funding snapshot of a perpetual contract
// =============================================================================
//
// Funding rates are periodic payments between longs and shorts that anchor the
// perpetual contract price to spot.  The provider reports the rate as a
// decimal (0.0001 = 0.01%); the scorer works in percent.
//
// Crowding thresholds (absolute, in percent):
//   > 0.05  =>  EXTREME   (one side heavily overleveraged)
//   > 0.03  =>  ELEVATED  (composite score starts paying a penalty)
//   else    =>  NORMAL

use serde::{Deserialize, Serialize};

/// |funding %| above which the composite score is penalised.
pub const FUNDING_ELEVATED_PCT: f64 = 0.03;
/// |funding %| above which funding is considered extreme.
pub const FUNDING_EXTREME_PCT: f64 = 0.05;

/// Mark price and funding snapshot for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkSnapshot {
    pub mark_price: f64,
    pub index_price: f64,
    /// Raw funding rate as a decimal (e.g. 0.0001 = 0.01%).
    pub last_funding_rate: f64,
    /// Timestamp (ms) of the next funding event.
    pub next_funding_time: i64,
}

impl MarkSnapshot {
    /// Funding rate in percent.  Non-finite input maps to 0.
    pub fn funding_rate_pct(&self) -> f64 {
        let pct = self.last_funding_rate * 100.0;
        if pct.is_finite() {
            pct
        } else {
            0.0
        }
    }
}

/// Coarse funding pressure label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundingPressure {
    Normal,
    Elevated,
    Extreme,
}

impl FundingPressure {
    pub fn from_pct(rate_pct: f64) -> Self {
        let abs = rate_pct.abs();
        if abs > FUNDING_EXTREME_PCT {
            Self::Extreme
        } else if abs > FUNDING_ELEVATED_PCT {
            Self::Elevated
        } else {
            Self::Normal
        }
    }
}

impl std::fmt::Display for FundingPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Elevated => write!(f, "elevated"),
            Self::Extreme => write!(f, "extreme"),
        }
    }
}
