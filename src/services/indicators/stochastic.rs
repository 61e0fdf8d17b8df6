//! Stochastic Oscillator indicator.

use std::collections::VecDeque;

use super::Indicator;
use crate::types::Bar;

/// One stochastic reading. `%D` lags `%K` by `d_period - 1` bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochasticValue {
    pub k: f64,
    pub d: Option<f64>,
}

/// Stochastic Oscillator.
///
/// Compares closing price to price range over a period:
/// %K = (Current Close - Lowest Low) / (Highest High - Lowest Low) * 100
/// %D = simple mean of the last `d_period` %K values
///
/// When the trailing range is zero, %K carries the previous reading forward;
/// before any reading exists it stays undefined.
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
    highs: VecDeque<f64>,
    lows: VecDeque<f64>,
    k_values: VecDeque<f64>,
    last_k: Option<f64>,
}

impl Default for Stochastic {
    fn default() -> Self {
        Self::new(14, 3)
    }
}

impl Stochastic {
    pub fn new(k_period: usize, d_period: usize) -> Self {
        Self {
            k_period,
            d_period,
            highs: VecDeque::with_capacity(k_period),
            lows: VecDeque::with_capacity(k_period),
            k_values: VecDeque::with_capacity(d_period),
            last_k: None,
        }
    }

    fn percent_k(&self, close: f64) -> Option<f64> {
        let lowest_low = self.lows.iter().copied().fold(f64::INFINITY, f64::min);
        let highest_high = self.highs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = highest_high - lowest_low;

        if range > 0.0 {
            Some(((close - lowest_low) / range) * 100.0)
        } else {
            self.last_k
        }
    }
}

impl Indicator for Stochastic {
    type Input = Bar;
    type Output = StochasticValue;

    fn next(&mut self, bar: Bar) -> Option<StochasticValue> {
        if self.k_period == 0 || self.d_period == 0 {
            return None;
        }

        self.highs.push_back(bar.high);
        self.lows.push_back(bar.low);
        if self.highs.len() > self.k_period {
            self.highs.pop_front();
            self.lows.pop_front();
        }
        if self.highs.len() < self.k_period {
            return None;
        }

        let k = self.percent_k(bar.close)?;
        self.last_k = Some(k);

        self.k_values.push_back(k);
        if self.k_values.len() > self.d_period {
            self.k_values.pop_front();
        }
        let d = (self.k_values.len() == self.d_period)
            .then(|| self.k_values.iter().sum::<f64>() / self.d_period as f64);

        Some(StochasticValue { k, d })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::indicators::run;
    use chrono::{Duration, NaiveDate};

    fn create_uptrend_bars(count: usize) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..count)
            .map(|i| {
                let base = 100.0 + i as f64 * 1.5;
                Bar {
                    date: start + Duration::days(i as i64),
                    open: base,
                    high: base + 2.0,
                    low: base - 1.0,
                    close: base + 1.0,
                    volume: 1000,
                }
            })
            .collect()
    }

    fn flat_bar(day: i64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(day),
            open: 50.0,
            high: 50.0,
            low: 50.0,
            close: 50.0,
            volume: 10,
        }
    }

    #[test]
    fn test_stochastic_warm_up() {
        let values = run(Stochastic::default(), create_uptrend_bars(20));
        assert!(values[..13].iter().all(Option::is_none));
        let first = values[13].unwrap();
        assert!(first.d.is_none());
        assert!(values[14].unwrap().d.is_none());
        assert!(values[15].unwrap().d.is_some());
    }

    #[test]
    fn test_stochastic_uptrend_high_k() {
        let last = run(Stochastic::default(), create_uptrend_bars(30)).pop().flatten().unwrap();
        assert!(last.k > 50.0, "Stochastic %K in uptrend should be > 50, got {}", last.k);
        assert!((0.0..=100.0).contains(&last.k));
    }

    #[test]
    fn test_stochastic_d_is_mean_of_last_three_k() {
        let values: Vec<StochasticValue> = run(Stochastic::default(), create_uptrend_bars(30))
            .into_iter()
            .flatten()
            .collect();
        let n = values.len();
        let expected = (values[n - 1].k + values[n - 2].k + values[n - 3].k) / 3.0;
        assert!((values[n - 1].d.unwrap() - expected).abs() < 1e-10);
    }

    #[test]
    fn test_stochastic_zero_range_without_history_is_undefined() {
        let bars: Vec<Bar> = (0..20).map(flat_bar).collect();
        let values = run(Stochastic::default(), bars);
        assert!(values.iter().all(Option::is_none));
    }

    #[test]
    fn test_stochastic_zero_range_carries_forward() {
        let mut bars = create_uptrend_bars(20);
        let last_close = bars.last().unwrap().close;
        let start = bars.len() as i64;
        // 14 identical bars collapse the trailing range to zero
        for i in 0..14 {
            let mut bar = flat_bar(start + i);
            bar.open = last_close;
            bar.high = last_close;
            bar.low = last_close;
            bar.close = last_close;
            bars.push(bar);
        }

        let values = run(Stochastic::default(), bars);
        let before = values[32].unwrap().k;
        let after = values[33].unwrap().k;
        assert_eq!(before, after);
    }
}
