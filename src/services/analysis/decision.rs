//! The BUY/SELL/HOLD rule.

use crate::types::{LatestIndicators, ObvMomentum, TrendFlags, Verdict};

/// ADX above this marks a strong trend.
pub const STRONG_TREND_ADX: f64 = 25.0;

/// Window of the short weighted OBV average.
pub const OBV_SHORT_WINDOW: usize = 50;

/// Window of the long weighted OBV average.
pub const OBV_LONG_WINDOW: usize = 200;

/// Classify trend direction and strength from the latest values.
///
/// Bullish needs both EMA_15 > EMA_50 and SMA_50 > SMA_200, bearish needs
/// both inequalities reversed. Anything else raises neither flag.
pub fn trend_flags(latest: &LatestIndicators) -> TrendFlags {
    TrendFlags {
        bullish: latest.ema_15 > latest.ema_50 && latest.sma_50 > latest.sma_200,
        bearish: latest.ema_15 < latest.ema_50 && latest.sma_50 < latest.sma_200,
        strong: latest.adx > STRONG_TREND_ADX,
    }
}

/// BUY on a strong bullish trend with rising OBV, SELL on a strong bearish
/// trend with falling OBV, HOLD otherwise.
pub fn decide(flags: TrendFlags, momentum: ObvMomentum) -> Verdict {
    match (flags, momentum) {
        (
            TrendFlags {
                bullish: true,
                strong: true,
                ..
            },
            ObvMomentum::Rising,
        ) => Verdict::Buy,
        (
            TrendFlags {
                bearish: true,
                strong: true,
                ..
            },
            ObvMomentum::Falling,
        ) => Verdict::Sell,
        _ => Verdict::Hold,
    }
}
