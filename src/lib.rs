//! Stock Analyzer - technical indicators and rule-based trade signals for daily equity data

pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

pub use error::{AnalysisError, AppError};
pub use services::analysis::{analyze, analyze_with, NarrativeFormat};
pub use services::indicators::compute_indicators;
pub use services::market_data::{MarketDataService, MarketDataSource, MarketSnapshot};
pub use types::*;
