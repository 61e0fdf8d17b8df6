//! Markdown narrative for an analysis report.

use crate::types::{AnalysisReport, CapCategory, TrendDirection};

/// Marker printed for any fundamentals field the source did not supply.
pub const NOT_AVAILABLE: &str = "not available";

/// Presentation settings for numbers in the narrative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeFormat {
    /// Prefix for money amounts, e.g. "₹" or "$". Empty for none.
    pub currency: String,
    /// Decimal places for prices and indicator values.
    pub decimals: usize,
}

impl Default for NarrativeFormat {
    fn default() -> Self {
        Self {
            currency: String::new(),
            decimals: 2,
        }
    }
}

impl NarrativeFormat {
    pub fn new(currency: impl Into<String>, decimals: usize) -> Self {
        Self {
            currency: currency.into(),
            decimals,
        }
    }

    pub fn price(&self, value: f64) -> String {
        format!("{}{:.*}", self.currency, self.decimals, value)
    }

    pub fn number(&self, value: f64) -> String {
        format!("{:.*}", self.decimals, value)
    }

    pub fn market_cap(&self, value: Option<f64>) -> String {
        match value {
            Some(cap) => format!("{}{:.*} billion", self.currency, self.decimals, cap / 1e9),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    pub fn pe_ratio(&self, value: Option<f64>) -> String {
        value.map_or_else(|| NOT_AVAILABLE.to_string(), |pe| self.number(pe))
    }

    pub fn dividend_yield(&self, value: Option<f64>) -> String {
        value.map_or_else(
            || NOT_AVAILABLE.to_string(),
            |dy| format!("{:.*}%", self.decimals, dy * 100.0),
        )
    }
}

fn above_below(above: bool) -> &'static str {
    if above {
        "above"
    } else {
        "below"
    }
}

/// Render the narrative for a fully-populated report.
pub fn render(report: &AnalysisReport, fmt: &NarrativeFormat) -> String {
    let ticker = &report.ticker;
    let l = &report.latest;
    let f = &report.fundamentals;
    let macd_above = l.macd > l.macd_signal;
    let market_cap = fmt.market_cap(f.market_cap);
    let pe = fmt.pe_ratio(f.trailing_pe);

    let mut lines = vec![
        format!("**Analysis for {ticker}:**"),
        String::new(),
        "### Technical Analysis:".to_string(),
        format!("1. **Current Price:** {}", fmt.price(report.price.current_price)),
        format!("2. **50-day SMA:** {}", fmt.price(l.sma_50)),
        format!("3. **200-day SMA:** {}", fmt.price(l.sma_200)),
        format!("4. **RSI:** {}", fmt.number(l.rsi)),
        format!("5. **MACD:** {}", fmt.number(l.macd)),
        format!("6. **MACD Signal:** {}", fmt.number(l.macd_signal)),
        format!("7. **EMA 15:** {}", fmt.price(l.ema_15)),
        format!("8. **EMA 50:** {}", fmt.price(l.ema_50)),
        format!("9. **Stochastic %K:** {}", fmt.number(l.stochastic_k)),
        format!("10. **Stochastic %D:** {}", fmt.number(l.stochastic_d)),
        format!("11. **OBV:** {}", fmt.number(l.obv)),
        format!(
            "12. **ADX:** {} (+DI {}, -DI {})",
            fmt.number(l.adx),
            fmt.number(l.plus_di),
            fmt.number(l.minus_di)
        ),
        String::new(),
        "### Fundamental Analysis:".to_string(),
        format!("1. **Market Cap:** {market_cap}"),
        format!("2. **P/E Ratio:** {pe}"),
        format!("3. **Dividend Yield:** {}", fmt.dividend_yield(f.dividend_yield)),
        format!("4. **Period High:** {}", fmt.price(report.price.period_high)),
        format!("5. **Period Low:** {}", fmt.price(report.price.period_low)),
        format!("6. **Average Daily Volume:** {:.0}", report.price.average_volume),
        String::new(),
        "### Key Insights and Recommendation:".to_string(),
        format!(
            "{ticker} is currently trading at {}.",
            fmt.price(report.price.current_price)
        ),
        String::new(),
        "**Technical Outlook:**".to_string(),
    ];

    lines.push(match report.trend {
        TrendDirection::Mixed => format!(
            "- The moving averages disagree (EMA 15 {} EMA 50, SMA 50 {} SMA 200), so the trend is mixed.",
            above_below(l.ema_15 > l.ema_50),
            above_below(l.sma_50 > l.sma_200)
        ),
        trend => format!(
            "- EMA 15 is {} EMA 50 and SMA 50 is {} SMA 200, indicating a {} trend.",
            above_below(l.ema_15 > l.ema_50),
            above_below(l.sma_50 > l.sma_200),
            trend.label()
        ),
    });
    lines.push(format!(
        "- The RSI at {} suggests the stock is {}.",
        fmt.number(l.rsi),
        report.rsi_zone.label()
    ));
    lines.push(format!(
        "- The MACD ({}) is {} its signal line ({}), suggesting {} momentum.",
        fmt.number(l.macd),
        above_below(macd_above),
        fmt.number(l.macd_signal),
        if macd_above { "bullish" } else { "bearish" }
    ));
    lines.push(format!(
        "- The Stochastic Oscillator shows {} conditions, with %K crossing {} %D.",
        report.stochastic_zone.label(),
        above_below(l.stochastic_signal)
    ));
    lines.push(format!("- OBV is {}.", report.obv_trend.momentum.description()));
    lines.push(format!(
        "- The ADX at {} confirms a {} trend.",
        fmt.number(l.adx),
        if report.flags.strong { "strong" } else { "weak" }
    ));

    lines.push(String::new());
    lines.push("**Fundamental Considerations:**".to_string());
    lines.push(match report.cap_category {
        CapCategory::Unknown => {
            "- The market cap is not available, so the company size is unknown.".to_string()
        }
        category => format!(
            "- With a market cap of {market_cap}, this is a {} cap stock.",
            category.label()
        ),
    });
    lines.push(match f.trailing_pe {
        Some(_) => format!(
            "- The P/E ratio of {pe} {}.",
            report.valuation.description()
        ),
        None => "- The P/E ratio is not available, so valuation cannot be assessed.".to_string(),
    });

    lines.push(String::new());
    lines.push("**Recommendation:**".to_string());
    lines.push(format!(
        "Based on the analysis, the current recommendation for {ticker} is to **{}**.",
        report.verdict.badge()
    ));
    lines.push(format!("**Reason:** {}", report.rationale));
    lines.push(String::new());
    lines.push(
        "*Note: These insights are based on historical data and technical analysis. \
         Always conduct your own research or consult with a financial advisor before \
         making investment decisions.*"
            .to_string(),
    );

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_with_currency() {
        let fmt = NarrativeFormat::new("₹", 2);
        assert_eq!(fmt.price(1234.5), "₹1234.50");
        assert_eq!(fmt.number(3.14159), "3.14");
    }

    #[test]
    fn test_format_market_cap_in_billions() {
        let fmt = NarrativeFormat::new("$", 1);
        assert_eq!(fmt.market_cap(Some(150e9)), "$150.0 billion");
        assert_eq!(fmt.market_cap(None), NOT_AVAILABLE);
    }

    #[test]
    fn test_format_missing_fundamentals_never_zero() {
        let fmt = NarrativeFormat::default();
        assert_eq!(fmt.pe_ratio(None), NOT_AVAILABLE);
        assert_eq!(fmt.dividend_yield(None), NOT_AVAILABLE);
        assert_eq!(fmt.dividend_yield(Some(0.0125)), "1.25%");
    }
}
