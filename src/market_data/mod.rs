pub mod candle;
pub mod source;
pub mod ticker;

// Re-export for convenient access (e.g. `use crate::market_data::Candle`).
pub use candle::{Candle, CandleSeries};
pub use source::MarketDataSource;
pub use ticker::{InstrumentInfo, TickerSnapshot};
