//! Relative Strength Index (RSI) indicator.

use std::collections::VecDeque;

use super::Indicator;

/// RSI (Relative Strength Index).
///
/// Compares the simple mean of the last `period` gains to the simple mean of
/// the last `period` losses (close-to-close deltas). Values range from 0-100:
/// - Below 30: Oversold
/// - Above 70: Overbought
pub struct Rsi {
    period: usize,
    prev_close: Option<f64>,
    gains: VecDeque<f64>,
    losses: VecDeque<f64>,
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            prev_close: None,
            gains: VecDeque::with_capacity(period),
            losses: VecDeque::with_capacity(period),
        }
    }
}

/// Turn average gain / average loss into an RSI value.
///
/// A zero average loss means maximal strength and saturates at 100, flat
/// windows included.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

impl Indicator for Rsi {
    type Input = f64;
    type Output = f64;

    fn next(&mut self, close: f64) -> Option<f64> {
        let prev = self.prev_close.replace(close)?;
        if self.period == 0 {
            return None;
        }

        let change = close - prev;
        self.gains.push_back(change.max(0.0));
        self.losses.push_back((-change).max(0.0));
        if self.gains.len() > self.period {
            self.gains.pop_front();
            self.losses.pop_front();
        }
        if self.gains.len() < self.period {
            return None;
        }

        let avg_gain = self.gains.iter().sum::<f64>() / self.period as f64;
        let avg_loss = self.losses.iter().sum::<f64>() / self.period as f64;
        Some(rsi_from_averages(avg_gain, avg_loss))
    }
}
