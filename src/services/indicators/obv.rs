//! On-Balance Volume (OBV) indicator.

use super::Indicator;
use crate::types::Bar;

/// OBV (On-Balance Volume) indicator.
///
/// Cumulative volume indicator, starting at the first bar's volume:
/// - If close > previous close: OBV += volume
/// - If close < previous close: OBV -= volume
/// - Otherwise OBV is unchanged
#[derive(Default)]
pub struct Obv {
    prev_close: Option<f64>,
    value: f64,
}

impl Obv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Indicator for Obv {
    type Input = Bar;
    type Output = f64;

    fn next(&mut self, bar: Bar) -> Option<f64> {
        let volume = bar.volume as f64;
        self.value = match self.prev_close {
            None => volume,
            Some(prev) if bar.close > prev => self.value + volume,
            Some(prev) if bar.close < prev => self.value - volume,
            Some(_) => self.value,
        };
        self.prev_close = Some(bar.close);
        Some(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::indicators::run;
    use chrono::{Duration, NaiveDate};

    fn bars(closes: &[f64], volume: u64) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume,
            })
            .collect()
    }

    #[test]
    fn test_obv_seeded_with_first_volume() {
        let values = run(Obv::new(), bars(&[10.0], 500));
        assert_eq!(values, vec![Some(500.0)]);
    }

    #[test]
    fn test_obv_up_down_unchanged() {
        let values = run(Obv::new(), bars(&[10.0, 11.0, 10.5, 10.5], 100));
        assert_eq!(values, vec![Some(100.0), Some(200.0), Some(100.0), Some(100.0)]);
    }

    #[test]
    fn test_obv_non_decreasing_when_close_rises() {
        let closes: Vec<f64> = (1..=50).map(|x| x as f64).collect();
        let values: Vec<f64> = run(Obv::new(), bars(&closes, 1_000)).into_iter().flatten().collect();
        assert!(values.windows(2).all(|w| w[1] >= w[0]));
    }
}
