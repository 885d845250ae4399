//! Stock health enums.
//!
//! [`DaysCover`] is the input to classification and [`StockStatus`] is its
//! output. The thresholds themselves live in [`crate::status`].

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Replenishment health of a product at the 3PL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Less than 10 days of cover.
    Critical,
    /// Between 10 and 21 days of cover, inclusive.
    Caution,
    /// More than 21 days of cover, or no sales at all.
    #[default]
    Good,
}

impl StockStatus {
    /// Returns true for statuses that should be surfaced in alert banners.
    #[must_use]
    pub const fn needs_attention(self) -> bool {
        matches!(self, Self::Critical | Self::Caution)
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::Caution => write!(f, "caution"),
            Self::Good => write!(f, "good"),
        }
    }
}

impl std::str::FromStr for StockStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Self::Critical),
            "caution" => Ok(Self::Caution),
            "good" => Ok(Self::Good),
            _ => Err(format!("invalid stock status: {s}")),
        }
    }
}

/// Estimated number of days the 3PL stock lasts at the current sales rate.
///
/// `Unbounded` is produced only when there are no positive sales. A finite
/// value that happens to equal [`DaysCover::SENTINEL`] stays `Days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "days", rename_all = "snake_case")]
pub enum DaysCover {
    /// Finite cover, rounded to one decimal place and saturating at the
    /// `Decimal` range.
    Days(Decimal),
    /// No sales, so stock never runs out.
    Unbounded,
}

impl DaysCover {
    /// Numeric stand-in for [`DaysCover::Unbounded`] in flat exports.
    pub const SENTINEL: Decimal = Decimal::from_parts(999, 0, 0, false, 0);

    /// Flattens to a number, mapping `Unbounded` to [`Self::SENTINEL`].
    #[must_use]
    pub const fn as_decimal(self) -> Decimal {
        match self {
            Self::Days(days) => days,
            Self::Unbounded => Self::SENTINEL,
        }
    }

    /// Returns true if there were no sales to divide by.
    #[must_use]
    pub const fn is_unbounded(self) -> bool {
        matches!(self, Self::Unbounded)
    }
}

impl fmt::Display for DaysCover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(days) => write!(f, "{days}"),
            Self::Unbounded => write!(f, "∞"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_roundtrip() {
        for status in [StockStatus::Critical, StockStatus::Caution, StockStatus::Good] {
            let parsed: StockStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("fine".parse::<StockStatus>().is_err());
    }

    #[test]
    fn test_needs_attention() {
        assert!(StockStatus::Critical.needs_attention());
        assert!(StockStatus::Caution.needs_attention());
        assert!(!StockStatus::Good.needs_attention());
    }

    #[test]
    fn test_unbounded_flattens_to_sentinel() {
        assert_eq!(DaysCover::Unbounded.as_decimal(), Decimal::from(999));
        assert_eq!(DaysCover::Unbounded.to_string(), "∞");
    }

    #[test]
    fn test_finite_999_is_not_unbounded() {
        let cover = DaysCover::Days(Decimal::from(999));
        assert!(!cover.is_unbounded());
        assert_eq!(cover.to_string(), "999");
    }

    #[test]
    fn test_days_cover_serde_shape() {
        let json = serde_json::to_value(DaysCover::Unbounded).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "unbounded"}));

        let json = serde_json::to_value(DaysCover::Days(Decimal::new(125, 1))).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "days", "days": "12.5"}));
    }
}
