//! Exponential Moving Average (EMA) indicator.

use super::Indicator;

/// One EMA recurrence step: `alpha * value + (1 - alpha) * prev`.
///
/// With no previous value the series is seeded with the raw input.
pub fn ema_step(prev: Option<f64>, value: f64, alpha: f64) -> f64 {
    match prev {
        Some(prev) => alpha * value + (1.0 - alpha) * prev,
        None => value,
    }
}

/// EMA (Exponential Moving Average) with smoothing `alpha = 2 / (span + 1)`.
///
/// Seeded with the first observation rather than an SMA, so it is defined
/// from the very first value.
pub struct Ema {
    alpha: f64,
    value: Option<f64>,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        Self {
            alpha: 2.0 / (span as f64 + 1.0),
            value: None,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

impl Indicator for Ema {
    type Input = f64;
    type Output = f64;

    fn next(&mut self, value: f64) -> Option<f64> {
        let ema = ema_step(self.value, value, self.alpha);
        self.value = Some(ema);
        Some(ema)
    }
}
