//! MACD (Moving Average Convergence Divergence) indicator.

use super::{Ema, Indicator};

/// One MACD reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
/// - Histogram = MACD Line - Signal Line
///
/// All three EMAs are first-value seeded, so every reading is defined.
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

impl Default for Macd {
    fn default() -> Self {
        Self::new(12, 26, 9)
    }
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast: Ema::new(fast_period),
            slow: Ema::new(slow_period),
            signal: Ema::new(signal_period),
        }
    }
}

impl Indicator for Macd {
    type Input = f64;
    type Output = MacdValue;

    fn next(&mut self, close: f64) -> Option<MacdValue> {
        let ema_fast = self.fast.next(close)?;
        let ema_slow = self.slow.next(close)?;
        let macd = ema_fast - ema_slow;
        let signal = self.signal.next(macd)?;

        Some(MacdValue {
            ema_fast,
            ema_slow,
            macd,
            signal,
            histogram: macd - signal,
        })
    }
}
