use serde::{Deserialize, Serialize};

use super::fundamentals::{CapCategory, FundamentalsSnapshot, Valuation};

/// Trade recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Buy,
    Sell,
    Hold,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Buy => "BUY",
            Verdict::Sell => "SELL",
            Verdict::Hold => "HOLD",
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            Verdict::Buy => "🟢 BUY",
            Verdict::Sell => "🔴 SELL",
            Verdict::Hold => "🟡 HOLD",
        }
    }

    pub fn rationale(&self) -> &'static str {
        match self {
            Verdict::Buy => "All buy signal criteria met.",
            Verdict::Sell => "All sell signal criteria met.",
            Verdict::Hold => "No clear buy or sell signal.",
        }
    }
}

/// Trend flags derived from the moving-average stack and ADX.
///
/// `bullish` and `bearish` are never both set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrendFlags {
    pub bullish: bool,
    pub bearish: bool,
    pub strong: bool,
}

impl TrendFlags {
    pub fn direction(&self) -> TrendDirection {
        match (self.bullish, self.bearish) {
            (true, _) => TrendDirection::Bullish,
            (_, true) => TrendDirection::Bearish,
            _ => TrendDirection::Mixed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Bullish,
    Bearish,
    Mixed,
}

impl TrendDirection {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Mixed => "mixed",
        }
    }
}

/// Direction of volume flow, from short vs long weighted OBV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObvMomentum {
    Rising,
    Falling,
}

impl ObvMomentum {
    pub fn from_averages(short_average: f64, long_average: f64) -> Self {
        if short_average > long_average {
            Self::Rising
        } else {
            Self::Falling
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Rising => "rising, indicating accumulation",
            Self::Falling => "falling, indicating distribution",
        }
    }
}

/// Overbought/oversold reading for a bounded oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OscillatorZone {
    Overbought,
    Oversold,
    Neutral,
}

impl OscillatorZone {
    /// RSI zones: above 70 overbought, below 30 oversold.
    pub fn from_rsi(rsi: f64) -> Self {
        Self::classify(rsi, 30.0, 70.0)
    }

    /// Stochastic zones: %K above 80 overbought, below 20 oversold.
    pub fn from_stochastic(k: f64) -> Self {
        Self::classify(k, 20.0, 80.0)
    }

    fn classify(value: f64, lower: f64, upper: f64) -> Self {
        if value > upper {
            Self::Overbought
        } else if value < lower {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Overbought => "overbought",
            Self::Oversold => "oversold",
            Self::Neutral => "neutral",
        }
    }
}

/// Most recent value of every indicator the decision rule reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestIndicators {
    pub close: f64,
    pub sma_50: f64,
    pub sma_200: f64,
    pub ema_15: f64,
    pub ema_50: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_histogram: f64,
    pub rsi: f64,
    pub stochastic_k: f64,
    pub stochastic_d: f64,
    pub obv: f64,
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
    pub ema_crossover: bool,
    pub stochastic_signal: bool,
}

/// Short vs long weighted OBV comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObvTrend {
    pub short_average: f64,
    pub long_average: f64,
    pub momentum: ObvMomentum,
}

/// Whole-series price statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSummary {
    pub current_price: f64,
    pub period_high: f64,
    pub period_low: f64,
    pub average_volume: f64,
}

/// Result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub ticker: String,
    pub latest: LatestIndicators,
    pub obv_trend: ObvTrend,
    pub price: PriceSummary,
    pub fundamentals: FundamentalsSnapshot,
    pub cap_category: CapCategory,
    pub valuation: Valuation,
    pub flags: TrendFlags,
    pub trend: TrendDirection,
    pub rsi_zone: OscillatorZone,
    pub stochastic_zone: OscillatorZone,
    pub verdict: Verdict,
    pub rationale: String,
    pub narrative: String,
}
