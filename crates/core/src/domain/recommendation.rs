use serde::{Deserialize, Serialize};
use std::fmt;

/// The four-tier recommendation label.
///
/// The tiers partition `[0, 10]` exactly: lower bounds are inclusive, there
/// are no gaps and no overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "SELL")]
    Sell,
}

impl Recommendation {
    /// Classify a final score into its tier.
    pub fn classify(final_score: f64) -> Self {
        if final_score >= 8.0 {
            Self::StrongBuy
        } else if final_score >= 6.0 {
            Self::Buy
        } else if final_score >= 4.0 {
            Self::Hold
        } else {
            Self::Sell
        }
    }

    /// Whether the label qualifies for the screener output.
    pub fn is_buy_grade(self) -> bool {
        matches!(self, Self::StrongBuy | Self::Buy)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG BUY",
            Self::Buy => "BUY",
            Self::Hold => "HOLD",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive_lower_bounds() {
        assert_eq!(Recommendation::classify(10.0), Recommendation::StrongBuy);
        assert_eq!(Recommendation::classify(8.0), Recommendation::StrongBuy);
        assert_eq!(Recommendation::classify(7.99), Recommendation::Buy);
        assert_eq!(Recommendation::classify(6.0), Recommendation::Buy);
        assert_eq!(Recommendation::classify(5.99), Recommendation::Hold);
        assert_eq!(Recommendation::classify(4.0), Recommendation::Hold);
        assert_eq!(Recommendation::classify(3.99), Recommendation::Sell);
        assert_eq!(Recommendation::classify(0.0), Recommendation::Sell);
    }

    #[test]
    fn serializes_as_fixed_labels() {
        let s = serde_json::to_string(&Recommendation::StrongBuy).unwrap();
        assert_eq!(s, "\"STRONG BUY\"");
        let s = serde_json::to_string(&Recommendation::Sell).unwrap();
        assert_eq!(s, "\"SELL\"");
    }

    #[test]
    fn buy_grades() {
        assert!(Recommendation::StrongBuy.is_buy_grade());
        assert!(Recommendation::Buy.is_buy_grade());
        assert!(!Recommendation::Hold.is_buy_grade());
        assert!(!Recommendation::Sell.is_buy_grade());
    }
}
