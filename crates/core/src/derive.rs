//! Weekly derivation engine.
//!
//! Turns one week's raw inputs into final stock positions at both locations,
//! bundle-driven demand and days of cover. Everything here is a pure function
//! of the catalog and a snapshot; results are recomputed on demand and never
//! written back.
//!
//! Per product:
//!
//! ```text
//! pack_sending       = sending             (bundle)
//!                    = sending × pack_size (otherwise)
//! our_final_stock    = our_stock − pack_sending + making
//! bundle_deduction   = Σ bundle.estimated_sales × bundle.units_per_item
//!                      over bundles containing the product
//! est_sales_raw      = estimated_sales             (bundle)
//!                    = estimated_sales × pack_size (otherwise)
//! total_thpl_sending = est_sales_raw + bundle_deduction
//! thpl_final_stock   = thpl_stock + pack_sending − total_thpl_sending
//! days_cover         = thpl_stock / (estimated_sales / 7), to 0.1 days
//! ```
//!
//! Stock positions are not floored at zero; a negative result means the week
//! is over-committed and is reported as such. Inputs are not range checked,
//! so every step saturates at `Decimal::MAX`/`Decimal::MIN` instead of
//! overflowing.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::{Catalog, Product};
use crate::status::{StockAlerts, classify};
use crate::types::{Category, DaysCover, ProductId, StockStatus};
use crate::week::{InputFields, WeekSnapshot};

const DAYS_PER_WEEK: Decimal = Decimal::from_parts(7, 0, 0, false, 0);
const TEN: Decimal = Decimal::TEN;
const HALF: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Computed values for one product in one week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedMetrics {
    /// Units leaving the warehouse for the 3PL.
    pub pack_sending: Decimal,
    /// Warehouse stock at the end of the week.
    pub our_final_stock: Decimal,
    /// 3PL demand caused by bundle sales.
    pub bundle_deduction: Decimal,
    /// Own sales in units.
    pub est_sales_raw: Decimal,
    /// Total units leaving the 3PL.
    pub total_thpl_sending: Decimal,
    /// 3PL stock at the end of the week.
    pub thpl_final_stock: Decimal,
    /// Days the starting 3PL stock lasts.
    pub days_cover: DaysCover,
    /// Health classification of `days_cover`.
    pub status: StockStatus,
}

/// Derive one product's metrics given the bundle demand placed on it.
#[must_use]
pub fn derive_product(
    product: &Product,
    inputs: &InputFields,
    bundle_deduction: Decimal,
) -> DerivedMetrics {
    let multiplier = if product.is_bundle {
        Decimal::ONE
    } else {
        Decimal::from(product.pack_size)
    };

    let pack_sending = inputs.sending.saturating_mul(multiplier);
    let our_final_stock = inputs
        .our_stock
        .saturating_sub(pack_sending)
        .saturating_add(inputs.making);

    let est_sales_raw = inputs.estimated_sales.saturating_mul(multiplier);
    let total_thpl_sending = est_sales_raw.saturating_add(bundle_deduction);
    let thpl_final_stock = inputs
        .thpl_stock
        .saturating_add(pack_sending)
        .saturating_sub(total_thpl_sending);

    let days_cover = days_cover(inputs.thpl_stock, inputs.estimated_sales);

    DerivedMetrics {
        pack_sending,
        our_final_stock,
        bundle_deduction,
        est_sales_raw,
        total_thpl_sending,
        thpl_final_stock,
        days_cover,
        status: classify(days_cover),
    }
}

/// Days of cover at the 3PL, rounded half-up to one decimal place.
///
/// Non-positive sales never run stock down, so cover is unbounded. A cover
/// too large to represent saturates at `Decimal::MAX` (or `Decimal::MIN` for
/// negative stock), which still classifies by sign.
#[must_use]
pub fn days_cover(thpl_stock: Decimal, estimated_sales: Decimal) -> DaysCover {
    if estimated_sales <= Decimal::ZERO {
        return DaysCover::Unbounded;
    }
    // stock / (sales / 7), reordered so a whole-number week stays exact.
    let raw = thpl_stock
        .checked_mul(DAYS_PER_WEEK)
        .and_then(|stock| stock.checked_div(estimated_sales))
        .or_else(|| {
            thpl_stock
                .checked_div(estimated_sales)
                .and_then(|weeks| weeks.checked_mul(DAYS_PER_WEEK))
        })
        .unwrap_or(if thpl_stock.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        });
    DaysCover::Days(round_tenths_half_up(raw))
}

/// Round to one decimal place, with halves going towards positive infinity.
///
/// Values too large to scale by ten have no tenths to round and are returned
/// as they are.
fn round_tenths_half_up(value: Decimal) -> Decimal {
    let Some(shifted) = value.checked_mul(TEN).and_then(|v| v.checked_add(HALF)) else {
        return value;
    };
    let mut rounded = shifted.floor() / TEN;
    rounded.rescale(1);
    rounded
}

/// Units of `id` consumed by this week's bundle sales.
#[must_use]
pub fn bundle_deduction(catalog: &Catalog, snapshot: &WeekSnapshot, id: ProductId) -> Decimal {
    catalog
        .bundles_containing(id)
        .iter()
        .filter_map(|bundle_id| catalog.get(*bundle_id))
        .map(|bundle| {
            snapshot
                .inputs(bundle.id)
                .estimated_sales
                .saturating_mul(Decimal::from(bundle.units_per_item))
        })
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// One product's inputs and derived metrics, as shown in a week table.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView<'a> {
    pub product: &'a Product,
    pub inputs: InputFields,
    pub metrics: DerivedMetrics,
}

/// Products of one category, in catalog order.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup<'a> {
    pub category: Category,
    pub title: &'static str,
    pub products: Vec<&'a ProductView<'a>>,
}

/// Every catalog product of one week, derived.
#[derive(Debug, Clone, Serialize)]
pub struct WeekView<'a> {
    pub week_label: &'a str,
    pub products: IndexMap<ProductId, ProductView<'a>>,
}

impl<'a> WeekView<'a> {
    /// Derived row for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&ProductView<'a>> {
        self.products.get(&id)
    }

    /// Derived metrics for a product.
    #[must_use]
    pub fn metrics(&self, id: ProductId) -> Option<&DerivedMetrics> {
        self.get(id).map(|row| &row.metrics)
    }

    /// All rows in catalog order.
    pub fn rows(&self) -> impl Iterator<Item = &ProductView<'a>> {
        self.products.values()
    }

    /// Critical and caution products for the alert banner.
    #[must_use]
    pub fn alerts(&self) -> StockAlerts {
        StockAlerts::collect(self.products.values())
    }

    /// Rows grouped by category in display order. Empty groups are skipped.
    #[must_use]
    pub fn groups(&self) -> Vec<CategoryGroup<'_>> {
        Category::ALL
            .into_iter()
            .filter_map(|category| {
                let products: Vec<_> = self
                    .products
                    .values()
                    .filter(|row| row.product.category == category)
                    .collect();
                (!products.is_empty()).then(|| CategoryGroup {
                    category,
                    title: category.title(),
                    products,
                })
            })
            .collect()
    }
}

/// Derive every catalog product for one week.
///
/// Products the snapshot doesn't track are treated as all-zero inputs;
/// snapshot entries for products outside the catalog are ignored.
#[must_use]
pub fn derive_week<'a>(catalog: &'a Catalog, snapshot: &'a WeekSnapshot) -> WeekView<'a> {
    let products = catalog
        .products()
        .map(|product| {
            let inputs = snapshot.inputs(product.id);
            let deduction = bundle_deduction(catalog, snapshot, product.id);
            let metrics = derive_product(product, &inputs, deduction);
            (
                product.id,
                ProductView {
                    product,
                    inputs,
                    metrics,
                },
            )
        })
        .collect();

    WeekView {
        week_label: snapshot.label(),
        products,
    }
}
