//! Simple Moving Average (SMA) indicator.

use std::collections::VecDeque;

use super::Indicator;

/// SMA (Simple Moving Average) of the trailing `period` values.
///
/// Undefined until `period` values have been seen.
pub struct Sma {
    period: usize,
    window: VecDeque<f64>,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            window: VecDeque::with_capacity(period),
        }
    }
}

impl Indicator for Sma {
    type Input = f64;
    type Output = f64;

    fn next(&mut self, value: f64) -> Option<f64> {
        if self.period == 0 {
            return None;
        }

        self.window.push_back(value);
        if self.window.len() > self.period {
            self.window.pop_front();
        }
        if self.window.len() < self.period {
            return None;
        }

        // Summed fresh each step so the value never drifts from the exact mean
        Some(self.window.iter().sum::<f64>() / self.period as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::indicators::run;

    #[test]
    fn test_sma_warm_up_is_undefined() {
        let values = run(Sma::new(3), [1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(values, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_sma_period_zero() {
        let values = run(Sma::new(0), [1.0, 2.0]);
        assert!(values.iter().all(Option::is_none));
    }
}
