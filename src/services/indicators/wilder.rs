//! Wilder's smoothing (alpha = 1 / period).

use super::Indicator;

/// Running Wilder average.
///
/// The first value is the simple mean of the first `period` inputs; after
/// that `avg = (prev * (period - 1) + value) / period`.
pub struct WilderAverage {
    period: usize,
    seed_sum: f64,
    seen: usize,
    value: Option<f64>,
}

impl WilderAverage {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            seed_sum: 0.0,
            seen: 0,
            value: None,
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

impl Indicator for WilderAverage {
    type Input = f64;
    type Output = f64;

    fn next(&mut self, value: f64) -> Option<f64> {
        if self.period == 0 {
            return None;
        }

        let period = self.period as f64;
        let next = match self.value {
            Some(prev) => Some((prev * (period - 1.0) + value) / period),
            None => {
                self.seed_sum += value;
                self.seen += 1;
                (self.seen == self.period).then(|| self.seed_sum / period)
            }
        };
        self.value = next;
        next
    }
}
