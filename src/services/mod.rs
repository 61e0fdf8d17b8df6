pub mod analysis;
pub mod cache;
pub mod indicators;
pub mod market_data;

pub use analysis::{analyze, analyze_with, NarrativeFormat};
pub use cache::TtlCache;
pub use indicators::{compute_indicators, Indicator};
pub use market_data::{normalize_ticker, MarketDataService, MarketDataSource, MarketSnapshot};
