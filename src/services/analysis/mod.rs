//! Signal and narrative generation.
//!
//! Reads the most recent point of an [`IndicatorSeries`], applies the trend /
//! volume / strength rule and assembles an [`AnalysisReport`].

pub mod decision;
pub mod narrative;

pub use decision::{decide, trend_flags, OBV_LONG_WINDOW, OBV_SHORT_WINDOW, STRONG_TREND_ADX};
pub use narrative::{NarrativeFormat, NOT_AVAILABLE};

use tracing::debug;

use crate::error::AnalysisError;
use crate::services::indicators::weighted_trailing_average;
use crate::types::{
    AnalysisReport, FundamentalsSnapshot, IndicatorSeries, LatestIndicators, ObvMomentum,
    ObvTrend, OscillatorZone, PriceSummary,
};

fn require<T>(value: Option<T>, indicator: &'static str) -> Result<T, AnalysisError> {
    value.ok_or(AnalysisError::InsufficientHistory { indicator })
}

/// Latest value of every indicator the rule reads.
///
/// Checked longest warm-up first, so a short series reports the indicator
/// that needs the most history.
pub fn latest_indicators(series: &IndicatorSeries) -> Result<LatestIndicators, AnalysisError> {
    let p = series
        .latest()
        .ok_or_else(|| AnalysisError::InvalidInput("indicator series is empty".into()))?;

    Ok(LatestIndicators {
        sma_200: require(p.sma_200, "SMA_200")?,
        sma_50: require(p.sma_50, "SMA_50")?,
        adx: require(p.adx, "ADX")?,
        plus_di: require(p.plus_di, "ADX_Pos")?,
        minus_di: require(p.minus_di, "ADX_Neg")?,
        stochastic_d: require(p.stochastic_d, "Stochastic_%D")?,
        stochastic_k: require(p.stochastic_k, "Stochastic_%K")?,
        stochastic_signal: require(p.stochastic_signal, "Stochastic_Signal")?,
        rsi: require(p.rsi, "RSI")?,
        ema_15: require(p.ema_15, "EMA_15")?,
        ema_50: require(p.ema_50, "EMA_50")?,
        ema_crossover: require(p.ema_crossover, "EMA_Crossover")?,
        macd: require(p.macd, "MACD")?,
        macd_signal: require(p.macd_signal, "Signal")?,
        macd_histogram: require(p.macd_histogram, "MACD_Histogram")?,
        obv: require(p.obv, "OBV")?,
        close: p.close,
    })
}

/// Compare the 50- and 200-bar linearly weighted OBV averages.
pub fn obv_trend(series: &IndicatorSeries) -> Result<ObvTrend, AnalysisError> {
    let obv = series.obv_values();
    let long_average = require(
        weighted_trailing_average(&obv, OBV_LONG_WINDOW),
        "OBV_WMA_200",
    )?;
    let short_average = require(
        weighted_trailing_average(&obv, OBV_SHORT_WINDOW),
        "OBV_WMA_50",
    )?;

    Ok(ObvTrend {
        short_average,
        long_average,
        momentum: ObvMomentum::from_averages(short_average, long_average),
    })
}

/// Latest close, whole-series high/low of closes and mean volume.
pub fn price_summary(series: &IndicatorSeries) -> Result<PriceSummary, AnalysisError> {
    let latest = series
        .latest()
        .ok_or_else(|| AnalysisError::InvalidInput("indicator series is empty".into()))?;

    let period_high = series.closes().fold(f64::NEG_INFINITY, f64::max);
    let period_low = series.closes().fold(f64::INFINITY, f64::min);
    let total_volume: f64 = series.points().iter().map(|p| p.volume as f64).sum();

    Ok(PriceSummary {
        current_price: latest.close,
        period_high,
        period_low,
        average_volume: total_volume / series.len() as f64,
    })
}

/// Analyze with the default narrative format.
pub fn analyze(
    ticker: &str,
    fundamentals: FundamentalsSnapshot,
    indicators: &IndicatorSeries,
) -> Result<AnalysisReport, AnalysisError> {
    analyze_with(&NarrativeFormat::default(), ticker, fundamentals, indicators)
}

/// Derive the verdict, rationale and narrative for `ticker`.
///
/// Fails with [`AnalysisError::InsufficientHistory`] naming the first
/// indicator whose latest value is undefined. Missing fundamentals are not an
/// error; they are reported as unavailable.
pub fn analyze_with(
    format: &NarrativeFormat,
    ticker: &str,
    fundamentals: FundamentalsSnapshot,
    indicators: &IndicatorSeries,
) -> Result<AnalysisReport, AnalysisError> {
    let latest = latest_indicators(indicators)?;
    let obv_trend = obv_trend(indicators)?;
    let price = price_summary(indicators)?;
    let fundamentals = fundamentals.sanitized();

    let flags = trend_flags(&latest);
    let verdict = decide(flags, obv_trend.momentum);

    debug!(
        "{}: trend={} strong={} obv={:?} => {}",
        ticker,
        flags.direction().label(),
        flags.strong,
        obv_trend.momentum,
        verdict.label()
    );

    let mut report = AnalysisReport {
        ticker: ticker.to_string(),
        latest,
        obv_trend,
        price,
        fundamentals,
        cap_category: fundamentals.cap_category(),
        valuation: fundamentals.valuation(),
        flags,
        trend: flags.direction(),
        rsi_zone: OscillatorZone::from_rsi(latest.rsi),
        stochastic_zone: OscillatorZone::from_stochastic(latest.stochastic_k),
        verdict,
        rationale: verdict.rationale().to_string(),
        narrative: String::new(),
    };
    report.narrative = narrative::render(&report, format);

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::indicators::compute_indicators;
    use crate::types::{Bar, CapCategory, TrendDirection, Valuation, Verdict};
    use chrono::{Duration, NaiveDate};

    fn trending_bars(count: usize, start_price: f64, step: f64) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        (0..count)
            .map(|i| {
                let close = start_price + i as f64 * step;
                Bar {
                    date: start + Duration::days(i as i64),
                    open: close - step / 2.0,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 10_000,
                }
            })
            .collect()
    }

    fn fundamentals() -> FundamentalsSnapshot {
        FundamentalsSnapshot {
            market_cap: Some(150e9),
            trailing_pe: Some(30.0),
            dividend_yield: Some(0.012),
        }
    }

    #[test]
    fn test_analyze_uptrend_is_buy() {
        let series = compute_indicators(&trending_bars(260, 100.0, 1.0)).unwrap();
        let report = analyze("TEST", fundamentals(), &series).unwrap();

        assert_eq!(report.verdict, Verdict::Buy);
        assert_eq!(report.rationale, "All buy signal criteria met.");
        assert_eq!(report.trend, TrendDirection::Bullish);
        assert_eq!(report.obv_trend.momentum, ObvMomentum::Rising);
        assert_eq!(report.cap_category, CapCategory::Large);
        assert_eq!(report.valuation, Valuation::Premium);
        assert!(report.narrative.contains("**Analysis for TEST:**"));
        assert!(report.narrative.contains("🟢 BUY"));
    }

    #[test]
    fn test_analyze_short_series_names_sma_200() {
        let series = compute_indicators(&trending_bars(150, 100.0, 1.0)).unwrap();
        let err = analyze("TEST", fundamentals(), &series).unwrap_err();
        assert_eq!(err, AnalysisError::InsufficientHistory { indicator: "SMA_200" });
    }

    #[test]
    fn test_analyze_empty_series() {
        let err = analyze("TEST", fundamentals(), &IndicatorSeries::new(Vec::new())).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_price_summary() {
        let series = compute_indicators(&trending_bars(10, 50.0, 2.0)).unwrap();
        let summary = price_summary(&series).unwrap();
        assert_eq!(summary.current_price, 68.0);
        assert_eq!(summary.period_high, 68.0);
        assert_eq!(summary.period_low, 50.0);
        assert_eq!(summary.average_volume, 10_000.0);
    }

    #[test]
    fn test_missing_fundamentals_reported_as_unavailable() {
        let series = compute_indicators(&trending_bars(260, 100.0, 1.0)).unwrap();
        let report = analyze("TEST", FundamentalsSnapshot::default(), &series).unwrap();

        assert_eq!(report.cap_category, CapCategory::Unknown);
        assert_eq!(report.valuation, Valuation::Unavailable);
        assert!(report.narrative.contains("**Market Cap:** not available"));
        assert!(report.narrative.contains("**P/E Ratio:** not available"));
        assert!(report.narrative.contains("**Dividend Yield:** not available"));
        assert!(!report.narrative.contains("0.00%"));
    }
}
