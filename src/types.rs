// =============================================================================
// Shared label types used across the momentum radar
// =============================================================================

use serde::{Deserialize, Serialize};

/// Trade direction suggested by the trend/RSI stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// +1.0 for Long, -1.0 for Short.
    pub fn sign(self) -> f64 {
        match self {
            Self::Long => 1.0,
            Self::Short => -1.0,
        }
    }

    /// Whether `value` is strictly on this direction's side of zero.
    pub fn agrees_with(self, value: f64) -> bool {
        value * self.sign() > 0.0
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Long => write!(f, "Long"),
            Self::Short => write!(f, "Short"),
        }
    }
}

/// How imminent a move looks, in escalating urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementState {
    #[serde(rename = "Likely in 24H")]
    LikelyIn24h,
    #[serde(rename = "About To Move")]
    AboutToMove,
    #[serde(rename = "Moving Now")]
    MovingNow,
}

impl std::fmt::Display for MovementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LikelyIn24h => write!(f, "Likely in 24H"),
            Self::AboutToMove => write!(f, "About To Move"),
            Self::MovingNow => write!(f, "Moving Now"),
        }
    }
}

/// Coarse confidence bucket.  Ordered so that `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}
