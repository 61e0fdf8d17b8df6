//! Market data access.
//!
//! [`MarketDataSource`] is the seam between the pure analysis core and any
//! upstream provider. [`MarketDataService`] adds ticker normalisation and a
//! short-lived snapshot cache on top of a source.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::services::analysis::{analyze_with, NarrativeFormat};
use crate::services::cache::TtlCache;
use crate::services::indicators::compute_indicators;
use crate::types::{AnalysisReport, BarSeries, FundamentalsSnapshot, IndicatorSeries, LookbackPeriod};

/// A provider of daily bars and fundamentals.
#[axum::async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Daily bars for `ticker` over `period`, oldest first.
    async fn fetch_bars(&self, ticker: &str, period: LookbackPeriod) -> Result<BarSeries>;

    /// Latest fundamentals for `ticker`. Fields the provider omits stay `None`.
    async fn fetch_fundamentals(&self, ticker: &str) -> Result<FundamentalsSnapshot>;
}

/// Everything fetched for one ticker and period.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub ticker: String,
    pub period: LookbackPeriod,
    pub bars: BarSeries,
    pub fundamentals: FundamentalsSnapshot,
    pub fetched_at: DateTime<Utc>,
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '&' | '-' | '^' | '=')
}

/// Uppercase `raw` and append `suffix` unless it is already present.
///
/// Returns `None` for a blank ticker or one containing characters outside
/// `A-Z 0-9 . & - ^ =`. An empty suffix leaves the symbol alone.
pub fn normalize_ticker(raw: &str, suffix: &str) -> Option<String> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() || !ticker.chars().all(is_symbol_char) {
        return None;
    }

    let suffix = suffix.trim().to_uppercase();
    if suffix.is_empty() || ticker.ends_with(&suffix) {
        Some(ticker)
    } else {
        Some(format!("{ticker}{suffix}"))
    }
}

/// Fetches snapshots through a source and runs the analysis over them.
pub struct MarketDataService {
    source: Arc<dyn MarketDataSource>,
    cache: TtlCache<Arc<MarketSnapshot>>,
    ticker_suffix: String,
    format: NarrativeFormat,
}

impl MarketDataService {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        cache_ttl: Duration,
        ticker_suffix: impl Into<String>,
        format: NarrativeFormat,
    ) -> Self {
        Self {
            source,
            cache: TtlCache::new(cache_ttl),
            ticker_suffix: ticker_suffix.into(),
            format,
        }
    }

    pub fn normalize(&self, raw: &str) -> Result<String> {
        normalize_ticker(raw, &self.ticker_suffix)
            .ok_or_else(|| AppError::BadRequest(format!("invalid ticker: {raw:?}")))
    }

    /// Bars and fundamentals for `raw_ticker`, served from cache when fresh.
    pub async fn snapshot(
        &self,
        raw_ticker: &str,
        period: LookbackPeriod,
    ) -> Result<Arc<MarketSnapshot>> {
        let ticker = self.normalize(raw_ticker)?;
        let key = format!("{}:{}", ticker, period.as_str());

        if let Some(snapshot) = self.cache.get(&key) {
            debug!("Cache hit for {}", key);
            return Ok(snapshot);
        }

        info!(
            "Fetching {} ({}) from {}",
            ticker,
            period.as_str(),
            self.source.name()
        );
        let (bars, fundamentals) = tokio::join!(
            self.source.fetch_bars(&ticker, period),
            self.source.fetch_fundamentals(&ticker),
        );
        let bars = bars?;
        // Fundamentals are optional; a failed lookup reads as all-unavailable.
        let fundamentals = fundamentals.unwrap_or_else(|e| {
            warn!("Fundamentals unavailable for {}: {}", ticker, e);
            FundamentalsSnapshot::default()
        });
        debug!("Fetched {} bars for {}", bars.len(), ticker);

        let snapshot = Arc::new(MarketSnapshot {
            ticker,
            period,
            bars,
            fundamentals,
            fetched_at: Utc::now(),
        });
        self.cache.insert(key, snapshot.clone());

        Ok(snapshot)
    }

    /// Indicator series for a fetched snapshot.
    pub fn indicators(&self, snapshot: &MarketSnapshot) -> Result<IndicatorSeries> {
        Ok(compute_indicators(snapshot.bars.bars())?)
    }

    /// Full report for a fetched snapshot, rendered with the configured format.
    pub fn analyze(&self, snapshot: &MarketSnapshot) -> Result<AnalysisReport> {
        let indicators = self.indicators(snapshot)?;
        let report = analyze_with(
            &self.format,
            &snapshot.ticker,
            snapshot.fundamentals,
            &indicators,
        )?;

        info!("{}: {}", report.ticker, report.verdict.label());
        Ok(report)
    }

    /// Fetch and analyze in one call.
    pub async fn analyze_ticker(
        &self,
        raw_ticker: &str,
        period: LookbackPeriod,
    ) -> Result<AnalysisReport> {
        let snapshot = self.snapshot(raw_ticker, period).await?;
        self.analyze(&snapshot)
    }
}
