use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Derived indicator values for one bar.
///
/// `None` means the indicator has not accumulated enough history yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: u64,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub ema_15: Option<f64>,
    pub ema_50: Option<f64>,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub rsi: Option<f64>,
    pub stochastic_k: Option<f64>,
    pub stochastic_d: Option<f64>,
    pub obv: Option<f64>,
    pub adx: Option<f64>,
    pub plus_di: Option<f64>,
    pub minus_di: Option<f64>,
    /// EMA_15 > EMA_50.
    pub ema_crossover: Option<bool>,
    /// %K > %D.
    pub stochastic_signal: Option<bool>,
}

/// Indicator records aligned 1:1 with the bar series they were computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    points: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn new(points: Vec<IndicatorPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[IndicatorPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&IndicatorPoint> {
        self.points.last()
    }

    /// Every defined OBV value, oldest first.
    pub fn obv_values(&self) -> Vec<f64> {
        self.points.iter().filter_map(|p| p.obv).collect()
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }
}
