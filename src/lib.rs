// =============================================================================
// Momentum Radar — futures momentum scanner
// =============================================================================
//
// Pipeline per scan pass:
//
//   universe ─> pre-screen (tickers only) ─> bounded deep evaluation
//            ─> indicator bundle ─> classifier + composite score
//            ─> ranking funnel (movers / strongest / full)
// =============================================================================

pub mod api;
pub mod app_state;
pub mod binance;
pub mod futures_intel;
pub mod indicators;
pub mod market_data;
pub mod runtime_config;
pub mod scanner;
pub mod scoring;
pub mod types;

pub use runtime_config::ScannerConfig;
pub use scanner::{ScanResult, Scanner};
pub use scoring::EvaluatedSymbol;
