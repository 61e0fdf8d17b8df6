//! Average Directional Index (ADX) indicator.

use super::{Indicator, WilderAverage};
use crate::types::Bar;

/// Directional movement reading for one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdxValue {
    pub plus_di: f64,
    pub minus_di: f64,
    /// Needs a further `period` DX values before it is defined.
    pub adx: Option<f64>,
}

/// ADX (Average Directional Index) indicator.
///
/// Measures trend strength (not direction):
/// - Below 20: Weak trend / ranging market
/// - 20-40: Trending
/// - Above 40: Strong trend
///
/// TR, +DM and -DM are Wilder-smoothed over `period` bars; ADX is the Wilder
/// average of DX. +DI/-DI first appear at index `period`, ADX at
/// `2 * period - 1`.
pub struct Adx {
    prev: Option<Bar>,
    tr: WilderAverage,
    plus_dm: WilderAverage,
    minus_dm: WilderAverage,
    dx: WilderAverage,
}

impl Default for Adx {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Adx {
    pub fn new(period: usize) -> Self {
        Self {
            prev: None,
            tr: WilderAverage::new(period),
            plus_dm: WilderAverage::new(period),
            minus_dm: WilderAverage::new(period),
            dx: WilderAverage::new(period),
        }
    }

    /// Calculate +DM and -DM between two bars.
    fn directional_movement(current: &Bar, previous: &Bar) -> (f64, f64) {
        let up_move = current.high - previous.high;
        let down_move = previous.low - current.low;

        let plus_dm = if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        };
        let minus_dm = if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        };

        (plus_dm, minus_dm)
    }
}

impl Indicator for Adx {
    type Input = Bar;
    type Output = AdxValue;

    fn next(&mut self, bar: Bar) -> Option<AdxValue> {
        let previous = self.prev.replace(bar)?;

        let (plus_dm, minus_dm) = Self::directional_movement(&bar, &previous);
        let atr = self.tr.next(bar.true_range(&previous));
        let smoothed_plus = self.plus_dm.next(plus_dm);
        let smoothed_minus = self.minus_dm.next(minus_dm);

        let (atr, smoothed_plus, smoothed_minus) = (atr?, smoothed_plus?, smoothed_minus?);

        let (plus_di, minus_di) = if atr > 0.0 {
            (
                (smoothed_plus / atr) * 100.0,
                (smoothed_minus / atr) * 100.0,
            )
        } else {
            (0.0, 0.0)
        };

        let di_sum = plus_di + minus_di;
        let dx = if di_sum > 0.0 {
            ((plus_di - minus_di).abs() / di_sum) * 100.0
        } else {
            0.0
        };

        Some(AdxValue {
            plus_di,
            minus_di,
            adx: self.dx.next(dx),
        })
    }
}
