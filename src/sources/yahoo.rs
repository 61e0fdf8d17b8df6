//! Yahoo Finance client for daily bars and fundamentals.
//!
//! Bars come from the v8 chart endpoint, fundamentals from the v7 quote
//! endpoint. Both are unofficial and unauthenticated.

use chrono::{DateTime, NaiveDate};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::services::market_data::MarketDataSource;
use crate::types::{Bar, BarSeries, FundamentalsSnapshot, LookbackPeriod};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    #[serde(default)]
    meta: YahooMeta,
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooMeta {
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

/// Yahoo Finance quote response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooQuoteResponse {
    quote_response: YahooQuoteResult,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteResult {
    #[serde(default)]
    result: Vec<YahooQuoteFields>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooQuoteFields {
    market_cap: Option<f64>,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<f64>,
    trailing_annual_dividend_yield: Option<f64>,
}

fn upstream_error(error: YahooError) -> AppError {
    AppError::ExternalApi(format!(
        "Yahoo API error: {} - {}",
        error.code, error.description
    ))
}

/// Convert a chart response into daily bars.
///
/// Rows with any missing or non-positive OHLC value are skipped, as are rows
/// whose open or close lies outside the low/high range. A missing volume
/// counts as zero. When two rows fall on the same exchange-local date
/// the later row wins.
fn parse_chart(response: YahooChartResponse) -> Result<Vec<Bar>> {
    if let Some(error) = response.chart.error {
        return Err(upstream_error(error));
    }

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| AppError::ExternalApi("No results in chart response".into()))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| AppError::ExternalApi("No quote data in chart response".into()))?;

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let value = |column: &[Option<f64>], i: usize| {
        column
            .get(i)
            .copied()
            .flatten()
            .filter(|v| v.is_finite() && *v > 0.0)
    };

    let mut bars: Vec<Bar> = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            value(&opens, i),
            value(&highs, i),
            value(&lows, i),
            value(&closes, i),
        ) else {
            continue;
        };
        let Some(date) = exchange_date(timestamp, result.meta.gmtoffset) else {
            continue;
        };

        let bar = Bar {
            date,
            open,
            high,
            low,
            close,
            volume: volumes.get(i).copied().flatten().unwrap_or(0),
        };
        if !bar.is_consistent() {
            debug!("Skipping inconsistent Yahoo row on {}", date);
            continue;
        }

        match bars.last_mut() {
            Some(last) if last.date == date => *last = bar,
            _ => bars.push(bar),
        }
    }

    Ok(bars)
}

fn exchange_date(timestamp: i64, gmtoffset: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp + gmtoffset, 0).map(|dt| dt.date_naive())
}

/// Extract fundamentals from a quote response.
fn parse_quote(response: YahooQuoteResponse) -> Result<FundamentalsSnapshot> {
    if let Some(error) = response.quote_response.error {
        return Err(upstream_error(error));
    }

    let fields = response
        .quote_response
        .result
        .into_iter()
        .next()
        .ok_or_else(|| AppError::ExternalApi("No results in quote response".into()))?;

    Ok(FundamentalsSnapshot {
        market_cap: fields.market_cap,
        trailing_pe: fields.trailing_pe,
        dividend_yield: fields.trailing_annual_dividend_yield,
    }
    .sanitized())
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
    base_url: Url,
}

impl YahooFinanceClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let base_url = base_url.into();
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| anyhow::anyhow!("invalid Yahoo base URL: {base_url:?}"))?;

        Ok(Self { client, base_url })
    }

    /// Append `segments` to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = request.build()?;
        debug!("Fetching Yahoo Finance data: {}", request.url());

        let response = self.client.execute(request).await?;
        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Yahoo API returned {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    /// Daily bars for `ticker` over `period`.
    pub async fn get_daily_bars(&self, ticker: &str, period: LookbackPeriod) -> Result<Vec<Bar>> {
        let request = self
            .client
            .get(self.endpoint(&["v8", "finance", "chart", ticker]))
            .query(&[
                ("range", period.as_str()),
                ("interval", "1d"),
                ("includePrePost", "false"),
            ]);
        let bars = parse_chart(self.get_json(request).await?)?;
        if bars.is_empty() {
            warn!("Yahoo returned no usable bars for {}", ticker);
            return Err(AppError::NotFound(format!("no price history for {ticker}")));
        }
        Ok(bars)
    }

    /// Market cap, trailing P/E and trailing annual dividend yield.
    pub async fn get_fundamentals(&self, ticker: &str) -> Result<FundamentalsSnapshot> {
        let request = self
            .client
            .get(self.endpoint(&["v7", "finance", "quote"]))
            .query(&[("symbols", ticker)]);
        parse_quote(self.get_json(request).await?)
    }
}

#[axum::async_trait]
impl MarketDataSource for YahooFinanceClient {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch_bars(&self, ticker: &str, period: LookbackPeriod) -> Result<BarSeries> {
        let bars = self.get_daily_bars(ticker, period).await?;
        Ok(BarSeries::new(bars)?)
    }

    async fn fetch_fundamentals(&self, ticker: &str) -> Result<FundamentalsSnapshot> {
        self.get_fundamentals(ticker).await
    }
}
