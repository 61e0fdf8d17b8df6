//! Technical indicator implementations.
//!
//! Each indicator is a small step function: it consumes one observation at a
//! time and carries only the state its recurrence needs, so every value at
//! index `i` depends on inputs `0..=i` alone.

pub mod adx;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod wilder;
pub mod wma;

pub use adx::{Adx, AdxValue};
pub use ema::{ema_step, Ema};
pub use macd::{Macd, MacdValue};
pub use obv::Obv;
pub use rsi::{rsi_from_averages, Rsi};
pub use sma::Sma;
pub use stochastic::{Stochastic, StochasticValue};
pub use wilder::WilderAverage;
pub use wma::weighted_trailing_average;

use tracing::debug;

use crate::error::AnalysisError;
use crate::types::{validate_bars, Bar, IndicatorPoint, IndicatorSeries};

/// Trait for streaming technical indicators.
pub trait Indicator {
    type Input;
    type Output;

    /// Feed one observation. Returns `None` while still warming up.
    fn next(&mut self, input: Self::Input) -> Option<Self::Output>;
}

/// Drive an indicator over a whole input sequence.
pub fn run<I, T>(mut indicator: I, inputs: T) -> Vec<Option<I::Output>>
where
    I: Indicator,
    T: IntoIterator<Item = I::Input>,
{
    inputs.into_iter().map(|x| indicator.next(x)).collect()
}

/// The full indicator set, evaluated bar by bar.
struct IndicatorSet {
    sma_50: Sma,
    sma_200: Sma,
    ema_15: Ema,
    ema_50: Ema,
    macd: Macd,
    rsi: Rsi,
    stochastic: Stochastic,
    obv: Obv,
    adx: Adx,
}

impl Default for IndicatorSet {
    fn default() -> Self {
        Self {
            sma_50: Sma::new(50),
            sma_200: Sma::new(200),
            ema_15: Ema::new(15),
            ema_50: Ema::new(50),
            macd: Macd::default(),
            rsi: Rsi::default(),
            stochastic: Stochastic::default(),
            obv: Obv::new(),
            adx: Adx::default(),
        }
    }
}

impl IndicatorSet {
    fn next(&mut self, bar: Bar) -> IndicatorPoint {
        let close = bar.close;
        let ema_15 = self.ema_15.next(close);
        let ema_50 = self.ema_50.next(close);
        let macd = self.macd.next(close);
        let stochastic = self.stochastic.next(bar);
        let adx = self.adx.next(bar);

        let stochastic_k = stochastic.map(|s| s.k);
        let stochastic_d = stochastic.and_then(|s| s.d);

        IndicatorPoint {
            date: bar.date,
            close,
            volume: bar.volume,
            sma_50: self.sma_50.next(close),
            sma_200: self.sma_200.next(close),
            ema_15,
            ema_50,
            ema_fast: macd.map(|m| m.ema_fast),
            ema_slow: macd.map(|m| m.ema_slow),
            macd: macd.map(|m| m.macd),
            macd_signal: macd.map(|m| m.signal),
            macd_histogram: macd.map(|m| m.histogram),
            rsi: self.rsi.next(close),
            stochastic_k,
            stochastic_d,
            obv: self.obv.next(bar),
            adx: adx.and_then(|a| a.adx),
            plus_di: adx.map(|a| a.plus_di),
            minus_di: adx.map(|a| a.minus_di),
            ema_crossover: ema_15.zip(ema_50).map(|(fast, slow)| fast > slow),
            stochastic_signal: stochastic_k.zip(stochastic_d).map(|(k, d)| k > d),
        }
    }
}

/// Compute the full indicator series for `bars`.
///
/// The output has exactly one point per bar. Fails with
/// [`AnalysisError::InvalidInput`] on an empty series, non-increasing dates or
/// non-positive prices.
pub fn compute_indicators(bars: &[Bar]) -> Result<IndicatorSeries, AnalysisError> {
    validate_bars(bars)?;

    let mut set = IndicatorSet::default();
    let points: Vec<IndicatorPoint> = bars.iter().map(|bar| set.next(*bar)).collect();

    debug!("Computed indicators for {} bars", points.len());

    Ok(IndicatorSeries::new(points))
}
