use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// One daily OHLCV observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// True range against the previous bar's close.
    pub fn true_range(&self, previous: &Bar) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - previous.close).abs();
        let lc = (self.low - previous.close).abs();
        hl.max(hc).max(lc)
    }

    /// `low` is the smallest price of the bar and `high` the largest.
    pub fn is_consistent(&self) -> bool {
        self.low <= self.high
            && self.low <= self.open.min(self.close)
            && self.high >= self.open.max(self.close)
    }
}

/// Check that `bars` is non-empty, strictly date-ascending, positively priced
/// and that every bar's open and close lie within its low/high range.
pub fn validate_bars(bars: &[Bar]) -> Result<(), AnalysisError> {
    if bars.is_empty() {
        return Err(AnalysisError::InvalidInput("bar series is empty".into()));
    }

    for (i, bar) in bars.iter().enumerate() {
        let prices = [bar.open, bar.high, bar.low, bar.close];
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "non-positive price on {} (index {})",
                bar.date, i
            )));
        }
        if !bar.is_consistent() {
            return Err(AnalysisError::InvalidInput(format!(
                "open/close outside low/high range on {} (index {})",
                bar.date, i
            )));
        }
        if i > 0 && bar.date <= bars[i - 1].date {
            return Err(AnalysisError::InvalidInput(format!(
                "timestamps not strictly increasing at index {} ({} after {})",
                i,
                bar.date,
                bars[i - 1].date
            )));
        }
    }

    Ok(())
}

/// Bars ordered by date, strictly ascending.
///
/// Construction validates the series once; everything downstream can rely on
/// a non-empty, monotonic, positively-priced sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Validate and wrap a list of bars.
    ///
    /// Fails on an empty list, a date that does not strictly follow its
    /// predecessor, a non-positive / non-finite price, or a bar whose open or
    /// close falls outside its low/high range. Nothing is sorted or
    /// de-duplicated here.
    pub fn new(bars: Vec<Bar>) -> Result<Self, AnalysisError> {
        validate_bars(&bars)?;
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bar> {
        self.bars.iter()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

impl<'a> IntoIterator for &'a BarSeries {
    type Item = &'a Bar;
    type IntoIter = std::slice::Iter<'a, Bar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}
