use serde::{Deserialize, Serialize};

/// Market cap above which a company counts as large cap (currency units).
pub const LARGE_CAP_THRESHOLD: f64 = 100e9;

/// Fundamentals as reported by the data source.
///
/// Each field is independently optional. A missing value is "not available",
/// never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundamentalsSnapshot {
    pub market_cap: Option<f64>,
    pub trailing_pe: Option<f64>,
    /// Fraction in 0..1 (0.025 = 2.5%).
    pub dividend_yield: Option<f64>,
}

impl FundamentalsSnapshot {
    /// Drop non-finite numbers so they read as absent downstream.
    pub fn sanitized(self) -> Self {
        let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
        Self {
            market_cap: finite(self.market_cap),
            trailing_pe: finite(self.trailing_pe),
            dividend_yield: finite(self.dividend_yield),
        }
    }

    pub fn cap_category(&self) -> CapCategory {
        CapCategory::from_market_cap(self.market_cap)
    }

    pub fn valuation(&self) -> Valuation {
        Valuation::from_pe(self.trailing_pe)
    }
}

/// Market-cap bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapCategory {
    Large,
    MidToSmall,
    Unknown,
}

impl CapCategory {
    pub fn from_market_cap(market_cap: Option<f64>) -> Self {
        match market_cap {
            Some(cap) if cap.is_finite() && cap > LARGE_CAP_THRESHOLD => Self::Large,
            Some(cap) if cap.is_finite() => Self::MidToSmall,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Large => "large",
            Self::MidToSmall => "mid to small",
            Self::Unknown => "unknown",
        }
    }
}

/// Rough valuation read from the trailing P/E.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Valuation {
    /// P/E above 25.
    Premium,
    /// P/E below 15.
    Undervalued,
    Normal,
    Unavailable,
}

impl Valuation {
    pub fn from_pe(pe: Option<f64>) -> Self {
        match pe {
            Some(pe) if pe.is_finite() && pe > 25.0 => Self::Premium,
            Some(pe) if pe.is_finite() && pe < 15.0 => Self::Undervalued,
            Some(pe) if pe.is_finite() => Self::Normal,
            _ => Self::Unavailable,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Premium => "suggests a premium valuation",
            Self::Undervalued => "indicates a potentially undervalued stock",
            Self::Normal => "is within a normal range",
            Self::Unavailable => "cannot be assessed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_category_thresholds() {
        assert_eq!(CapCategory::from_market_cap(Some(150e9)), CapCategory::Large);
        assert_eq!(CapCategory::from_market_cap(Some(50e9)), CapCategory::MidToSmall);
        assert_eq!(CapCategory::from_market_cap(Some(100e9)), CapCategory::MidToSmall);
        assert_eq!(CapCategory::from_market_cap(None), CapCategory::Unknown);
        assert_eq!(CapCategory::from_market_cap(Some(f64::NAN)), CapCategory::Unknown);
    }

    #[test]
    fn test_cap_category_labels() {
        assert_eq!(CapCategory::Large.label(), "large");
        assert_eq!(CapCategory::MidToSmall.label(), "mid to small");
        assert_eq!(CapCategory::Unknown.label(), "unknown");
    }

    #[test]
    fn test_valuation_from_pe() {
        assert_eq!(Valuation::from_pe(Some(30.0)), Valuation::Premium);
        assert_eq!(Valuation::from_pe(Some(10.0)), Valuation::Undervalued);
        assert_eq!(Valuation::from_pe(Some(20.0)), Valuation::Normal);
        assert_eq!(Valuation::from_pe(Some(25.0)), Valuation::Normal);
        assert_eq!(Valuation::from_pe(None), Valuation::Unavailable);
    }

    #[test]
    fn test_sanitized_drops_non_finite() {
        let snapshot = FundamentalsSnapshot {
            market_cap: Some(f64::INFINITY),
            trailing_pe: Some(18.0),
            dividend_yield: Some(f64::NAN),
        }
        .sanitized();
        assert_eq!(snapshot.market_cap, None);
        assert_eq!(snapshot.trailing_pe, Some(18.0));
        assert_eq!(snapshot.dividend_yield, None);
    }

    #[test]
    fn test_snapshot_serialization_keeps_nulls() {
        let json = serde_json::to_string(&FundamentalsSnapshot::default()).unwrap();
        assert_eq!(json, r#"{"marketCap":null,"trailingPe":null,"dividendYield":null}"#);
    }
}
