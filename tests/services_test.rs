//! Integration tests for the market data service

use axum::http::StatusCode;
use chrono::{Duration as ChronoDuration, NaiveDate};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use stock_analyzer::config::Config;
use stock_analyzer::error::Result;
use stock_analyzer::services::{MarketDataService, MarketDataSource};
use stock_analyzer::{
    AnalysisError, AppError, Bar, BarSeries, FundamentalsSnapshot, LookbackPeriod, Verdict,
};

/// In-memory source keyed by fully-qualified ticker.
struct InMemorySource {
    bars: HashMap<String, Vec<Bar>>,
    fundamentals: HashMap<String, FundamentalsSnapshot>,
    bar_requests: AtomicUsize,
}

impl InMemorySource {
    fn new() -> Self {
        Self {
            bars: HashMap::new(),
            fundamentals: HashMap::new(),
            bar_requests: AtomicUsize::new(0),
        }
    }

    fn with_trend(mut self, ticker: &str, count: usize, start: f64, step: f64) -> Self {
        let first = NaiveDate::from_ymd_opt(2022, 2, 1).unwrap();
        let bars = (0..count)
            .map(|i| {
                let close = start + i as f64 * step;
                Bar {
                    date: first + ChronoDuration::days(i as i64),
                    open: close,
                    high: close + 1.5,
                    low: close - 1.5,
                    close,
                    volume: 75_000,
                }
            })
            .collect();
        self.bars.insert(ticker.to_string(), bars);
        self
    }

    fn with_fundamentals(mut self, ticker: &str, snapshot: FundamentalsSnapshot) -> Self {
        self.fundamentals.insert(ticker.to_string(), snapshot);
        self
    }
}

#[axum::async_trait]
impl MarketDataSource for InMemorySource {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn fetch_bars(&self, ticker: &str, _period: LookbackPeriod) -> Result<BarSeries> {
        self.bar_requests.fetch_add(1, Ordering::SeqCst);
        let bars = self
            .bars
            .get(ticker)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("no price history for {ticker}")))?;
        Ok(BarSeries::new(bars)?)
    }

    async fn fetch_fundamentals(&self, ticker: &str) -> Result<FundamentalsSnapshot> {
        Ok(self.fundamentals.get(ticker).copied().unwrap_or_default())
    }
}

fn source() -> Arc<InMemorySource> {
    Arc::new(
        InMemorySource::new()
            .with_trend("RELIANCE.NS", 260, 2400.0, 3.0)
            .with_trend("YESBANK.NS", 260, 900.0, -2.0)
            .with_trend("NEWLIST.NS", 40, 100.0, 1.0)
            .with_trend("AAPL", 260, 150.0, 0.5)
            .with_fundamentals(
                "RELIANCE.NS",
                FundamentalsSnapshot {
                    market_cap: Some(1.9e13),
                    trailing_pe: Some(27.5),
                    dividend_yield: Some(0.0035),
                },
            ),
    )
}

fn service_with(source: Arc<InMemorySource>, config: &Config) -> MarketDataService {
    MarketDataService::new(
        source,
        config.cache_ttl(),
        config.ticker_suffix.clone(),
        config.narrative_format(),
    )
}

fn default_config() -> Config {
    Config::from_lookup(|_| None)
}

#[tokio::test]
async fn test_service_buy_with_fundamentals() {
    let svc = service_with(source(), &default_config());
    let report = svc
        .analyze_ticker("reliance", LookbackPeriod::OneYear)
        .await
        .unwrap();

    assert_eq!(report.ticker, "RELIANCE.NS");
    assert_eq!(report.verdict, Verdict::Buy);
    assert!(report.narrative.contains("₹19000.00 billion"));
    assert!(report.narrative.contains("suggests a premium valuation"));
}

#[tokio::test]
async fn test_service_sell_on_downtrend() {
    let svc = service_with(source(), &default_config());
    let report = svc
        .analyze_ticker("YESBANK", LookbackPeriod::OneYear)
        .await
        .unwrap();

    assert_eq!(report.verdict, Verdict::Sell);
    assert!(report.narrative.contains("**Dividend Yield:** not available"));
}

#[tokio::test]
async fn test_service_insufficient_history_maps_to_422() {
    let svc = service_with(source(), &default_config());
    let err = svc
        .analyze_ticker("newlist", LookbackPeriod::ThreeMonths)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Analysis(AnalysisError::InsufficientHistory { indicator: "SMA_200" })
    ));
    assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_service_indicators_available_for_short_history() {
    let svc = service_with(source(), &default_config());
    let snapshot = svc.snapshot("newlist", LookbackPeriod::ThreeMonths).await.unwrap();
    let series = svc.indicators(&snapshot).unwrap();

    assert_eq!(series.len(), 40);
    assert!(series.latest().unwrap().rsi.is_some());
    assert!(series.latest().unwrap().sma_50.is_none());
}

#[tokio::test]
async fn test_service_unknown_ticker_is_not_found() {
    let svc = service_with(source(), &default_config());
    let err = svc.snapshot("nosuch", LookbackPeriod::OneYear).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_service_rejects_ticker_with_url_characters() {
    let memory = source();
    let svc = service_with(memory.clone(), &default_config());
    let err = svc
        .snapshot("tcs?symbols=aapl", LookbackPeriod::OneYear)
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(memory.bar_requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_service_empty_suffix_uses_ticker_as_is() {
    let config = Config::from_lookup(|key| match key {
        "TICKER_SUFFIX" => Some(String::new()),
        "CURRENCY_SYMBOL" => Some("$".to_string()),
        _ => None,
    });
    let svc = service_with(source(), &config);
    let report = svc.analyze_ticker("aapl", LookbackPeriod::OneYear).await.unwrap();

    assert_eq!(report.ticker, "AAPL");
    assert!(report.narrative.contains("**Current Price:** $279.50"));
}

#[tokio::test]
async fn test_service_caches_until_ttl_expires() {
    let memory = source();
    let svc = MarketDataService::new(
        memory.clone(),
        Duration::from_millis(50),
        ".NS",
        Default::default(),
    );

    svc.snapshot("reliance", LookbackPeriod::OneYear).await.unwrap();
    svc.snapshot("Reliance.ns", LookbackPeriod::OneYear).await.unwrap();
    assert_eq!(memory.bar_requests.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_millis(80)).await;
    svc.snapshot("reliance", LookbackPeriod::OneYear).await.unwrap();
    assert_eq!(memory.bar_requests.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_service_zero_ttl_disables_cache() {
    let memory = source();
    let config = Config::from_lookup(|key| (key == "CACHE_TTL_SECS").then(|| "0".to_string()));
    let svc = service_with(memory.clone(), &config);

    svc.snapshot("reliance", LookbackPeriod::OneYear).await.unwrap();
    svc.snapshot("reliance", LookbackPeriod::OneYear).await.unwrap();
    assert_eq!(memory.bar_requests.load(Ordering::SeqCst), 2);
}

#[test]
fn test_error_status_mapping() {
    assert_eq!(
        AppError::from(AnalysisError::InvalidInput("empty".into())).status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        AppError::BadRequest("unknown period".into()).status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        AppError::ExternalApi("timeout".into()).status(),
        StatusCode::BAD_GATEWAY
    );
}
