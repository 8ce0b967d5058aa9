// =============================================================================
// Futures Intelligence Module
// =============================================================================
//
// Derivatives-specific inputs to the scorer, sourced from the futures API:
//
//   1. Funding Rate   — crowding signal; elevated funding is penalised
//   2. Open Interest  — participation delta over a short history window

pub mod funding_rate;
pub mod open_interest;

pub use funding_rate::{FundingPressure, MarkSnapshot};
pub use open_interest::{open_interest_delta_pct, OpenInterestPoint};
