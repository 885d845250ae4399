//! Stock health classification and week-level alert aggregation.
//!
//! Kept apart from the derivation engine so callers can classify a cover
//! value, or summarize a derived week, without recomputing anything.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::derive::ProductView;
use crate::types::{DaysCover, ProductId, StockStatus};

/// Cover strictly below this many days is critical.
pub const CRITICAL_BELOW_DAYS: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Cover up to and including this many days is caution.
pub const CAUTION_UP_TO_DAYS: Decimal = Decimal::from_parts(21, 0, 0, false, 0);

/// Map days of cover to a health category.
///
/// ```
/// use rust_decimal::Decimal;
/// use stock_planner_core::{DaysCover, StockStatus, classify};
///
/// assert_eq!(classify(DaysCover::Days(Decimal::new(99, 1))), StockStatus::Critical);
/// assert_eq!(classify(DaysCover::Days(Decimal::from(21))), StockStatus::Caution);
/// assert_eq!(classify(DaysCover::Unbounded), StockStatus::Good);
/// ```
#[must_use]
pub fn classify(cover: DaysCover) -> StockStatus {
    match cover {
        DaysCover::Unbounded => StockStatus::Good,
        DaysCover::Days(days) if days < CRITICAL_BELOW_DAYS => StockStatus::Critical,
        DaysCover::Days(days) if days <= CAUTION_UP_TO_DAYS => StockStatus::Caution,
        DaysCover::Days(_) => StockStatus::Good,
    }
}

/// One product listed in an alert banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertEntry {
    pub id: ProductId,
    pub name: String,
    pub days_cover: DaysCover,
}

/// Products needing attention in one week, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StockAlerts {
    /// Less than 10 days of cover.
    pub critical: Vec<AlertEntry>,
    /// 10 to 21 days of cover.
    pub caution: Vec<AlertEntry>,
    /// Number of products in good health.
    pub good: usize,
}

impl StockAlerts {
    /// Sort derived products into alert lists.
    #[must_use]
    pub fn collect<'a, 'b: 'a>(rows: impl IntoIterator<Item = &'a ProductView<'b>>) -> Self {
        let mut alerts = Self::default();
        for row in rows {
            let entry = || AlertEntry {
                id: row.product.id,
                name: row.product.name.clone(),
                days_cover: row.metrics.days_cover,
            };
            match row.metrics.status {
                StockStatus::Critical => alerts.critical.push(entry()),
                StockStatus::Caution => alerts.caution.push(entry()),
                StockStatus::Good => alerts.good += 1,
            }
        }
        alerts
    }

    /// Returns true if nothing is critical or caution.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.critical.is_empty() && self.caution.is_empty()
    }
}
