//! Week-to-week rollover and the planner facade.
//!
//! Closing stock of week N is the opening stock of week N+1, at both
//! locations and for every product independently. Activity inputs
//! (`making`, `sending`, `estimated_sales`) start the new week at zero.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::derive::{WeekView, derive_week};
use crate::status::StockAlerts;
use crate::types::ProductId;
use crate::week::{InputField, InputFields, StoreError, WeekSnapshot, WeekStore};

/// Errors returned by [`Planner`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    /// Editing or navigating the week store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// New weeks can only follow the most recent week.
    #[error("week {current} is not the latest week ({latest}); move to it before advancing")]
    NotLatestWeek { current: usize, latest: usize },
}

/// Build the week that follows `current`.
///
/// Each product opens with the previous week's final stocks and zero
/// activity.
#[must_use]
pub fn build_next_snapshot(
    catalog: &Catalog,
    current: &WeekSnapshot,
    label: impl Into<String>,
) -> WeekSnapshot {
    let view = derive_week(catalog, current);
    let entries = view.rows().map(|row| {
        (
            row.product.id,
            InputFields {
                our_stock: row.metrics.our_final_stock,
                thpl_stock: row.metrics.thpl_final_stock,
                making: Decimal::ZERO,
                sending: Decimal::ZERO,
                estimated_sales: Decimal::ZERO,
            },
        )
    });

    let next = WeekSnapshot::from_entries(label, entries);
    tracing::debug!(from = current.label(), to = next.label(), "Built next week");
    next
}

/// Positional label for the week that would be appended next, e.g. "Week 3".
///
/// A numeric suffix is added if a stored week already uses that label.
#[must_use]
pub fn default_week_label(store: &WeekStore) -> String {
    let base = format!("Week {}", store.len() + 1);
    let taken = |label: &str| store.weeks().iter().any(|week| week.label() == label);

    if !taken(&base) {
        return base;
    }
    let mut suffix = 2;
    loop {
        let candidate = format!("{base} ({suffix})");
        if !taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// A catalog and its week store, exposing the operations a front end needs.
#[derive(Debug, Clone)]
pub struct Planner {
    catalog: Catalog,
    store: WeekStore,
}

impl Planner {
    /// Start planning with one blank week.
    #[must_use]
    pub fn new(catalog: Catalog, first_label: impl Into<String>) -> Self {
        let store = WeekStore::new(&catalog, first_label);
        Self { catalog, store }
    }

    /// Resume planning from a previously saved store.
    ///
    /// Products added to the catalog since the store was saved get zero
    /// entries in every week.
    #[must_use]
    pub fn resume(catalog: Catalog, mut store: WeekStore) -> Self {
        store.align_to(&catalog);
        Self { catalog, store }
    }

    /// The product catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The week store.
    #[must_use]
    pub const fn store(&self) -> &WeekStore {
        &self.store
    }

    /// Give up the catalog and return the store, e.g. for saving.
    #[must_use]
    pub fn into_store(self) -> WeekStore {
        self.store
    }

    /// Set one input of the current week from raw text.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Store`] for a product the week doesn't track.
    pub fn set_input(
        &mut self,
        id: ProductId,
        field: InputField,
        raw: &str,
    ) -> Result<Decimal, PlannerError> {
        Ok(self.store.set_input(id, field, raw)?)
    }

    /// Relabel the current week.
    pub fn rename_current_week(&mut self, label: impl Into<String>) {
        self.store.rename_current(label);
    }

    /// Roll the latest week over into a new week labelled by position.
    ///
    /// Returns the new week's index, which becomes current.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::NotLatestWeek`] unless the cursor is on the
    /// latest week.
    pub fn advance_week(&mut self) -> Result<usize, PlannerError> {
        let label = default_week_label(&self.store);
        self.advance_week_with_label(label)
    }

    /// Roll the latest week over into a new week with the given label.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::NotLatestWeek`] unless the cursor is on the
    /// latest week.
    pub fn advance_week_with_label(
        &mut self,
        label: impl Into<String>,
    ) -> Result<usize, PlannerError> {
        if !self.store.is_latest() {
            return Err(PlannerError::NotLatestWeek {
                current: self.store.current_index(),
                latest: self.store.len() - 1,
            });
        }

        let next = build_next_snapshot(&self.catalog, self.store.current(), label);
        let index = self.store.append_from_transition(next)?;
        tracing::info!(week = index + 1, label = self.store.current().label(), "Advanced week");
        Ok(index)
    }

    /// Move to the previous week.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Store`] when already on the first week.
    pub fn previous_week(&mut self) -> Result<usize, PlannerError> {
        Ok(self.store.previous()?)
    }

    /// Move to the next week.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Store`] when already on the last week.
    pub fn next_week(&mut self) -> Result<usize, PlannerError> {
        Ok(self.store.next()?)
    }

    /// Move to a week by zero-based index.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Store`] if `index` isn't a stored week.
    pub fn select_week(&mut self, index: usize) -> Result<usize, PlannerError> {
        Ok(self.store.select(index)?)
    }

    /// Derive the current week.
    #[must_use]
    pub fn view(&self) -> WeekView<'_> {
        derive_week(&self.catalog, self.store.current())
    }

    /// Critical and caution products of the current week.
    #[must_use]
    pub fn alerts(&self) -> StockAlerts {
        self.view().alerts()
    }
}
