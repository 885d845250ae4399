//! Week snapshots and the append-only store that holds them.
//!
//! A [`WeekSnapshot`] is the editable input table for one planning week,
//! keyed by product in catalog order. The [`WeekStore`] owns the sequence of
//! snapshots and a cursor pointing at the week being edited. Derived metrics
//! are never stored here; see [`crate::derive`].

use core::fmt;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::types::{ProductId, parse_quantity};

/// Errors that can occur when editing or navigating a [`WeekStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store holds no weeks.
    #[error("week store has no snapshots")]
    Empty,

    /// A navigation target outside `0..len`.
    #[error("week index {index} is out of bounds (store has {len} weeks)")]
    OutOfBounds { index: usize, len: usize },

    /// The current week has no entry for this product.
    #[error("product {0} is not tracked in this week")]
    UnknownProduct(ProductId),
}

/// The five user-editable fields of a week entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    /// Warehouse starting stock, in packs.
    OurStock,
    /// Packs produced this week, added to the warehouse.
    Making,
    /// Packs or bundles shipped from the warehouse to the 3PL.
    Sending,
    /// 3PL starting stock, in packs.
    ThplStock,
    /// Forecast packs or bundles sold at the 3PL this week.
    EstimatedSales,
}

impl InputField {
    /// All fields in table order.
    pub const ALL: [Self; 5] = [
        Self::OurStock,
        Self::Making,
        Self::Sending,
        Self::ThplStock,
        Self::EstimatedSales,
    ];
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OurStock => write!(f, "our_stock"),
            Self::Making => write!(f, "making"),
            Self::Sending => write!(f, "sending"),
            Self::ThplStock => write!(f, "thpl_stock"),
            Self::EstimatedSales => write!(f, "estimated_sales"),
        }
    }
}

impl std::str::FromStr for InputField {
    type Err = String;

    /// Accepts `snake_case`, `camelCase` and `kebab-case` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "ourstock" => Ok(Self::OurStock),
            "making" => Ok(Self::Making),
            "sending" => Ok(Self::Sending),
            "thplstock" => Ok(Self::ThplStock),
            "estimatedsales" => Ok(Self::EstimatedSales),
            _ => Err(format!("invalid input field: {s}")),
        }
    }
}

/// User-entered values for one product in one week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFields {
    pub our_stock: Decimal,
    pub making: Decimal,
    pub sending: Decimal,
    pub thpl_stock: Decimal,
    pub estimated_sales: Decimal,
}

impl InputFields {
    /// Read one field.
    #[must_use]
    pub const fn get(&self, field: InputField) -> Decimal {
        match field {
            InputField::OurStock => self.our_stock,
            InputField::Making => self.making,
            InputField::Sending => self.sending,
            InputField::ThplStock => self.thpl_stock,
            InputField::EstimatedSales => self.estimated_sales,
        }
    }

    /// Overwrite one field.
    pub const fn set(&mut self, field: InputField, value: Decimal) {
        match field {
            InputField::OurStock => self.our_stock = value,
            InputField::Making => self.making = value,
            InputField::Sending => self.sending = value,
            InputField::ThplStock => self.thpl_stock = value,
            InputField::EstimatedSales => self.estimated_sales = value,
        }
    }
}

/// Input table for one planning week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSnapshot {
    week_label: String,
    entries: IndexMap<ProductId, InputFields>,
}

impl WeekSnapshot {
    /// A week with every catalog product present and all inputs zero.
    #[must_use]
    pub fn blank(catalog: &Catalog, week_label: impl Into<String>) -> Self {
        Self::from_entries(
            week_label,
            catalog.products().map(|p| (p.id, InputFields::default())),
        )
    }

    /// Build a week from explicit entries. Later duplicates overwrite earlier ones.
    #[must_use]
    pub fn from_entries(
        week_label: impl Into<String>,
        entries: impl IntoIterator<Item = (ProductId, InputFields)>,
    ) -> Self {
        Self {
            week_label: week_label.into(),
            entries: entries.into_iter().collect(),
        }
    }

    /// Free-text label, e.g. "WC 20/10".
    #[must_use]
    pub fn label(&self) -> &str {
        &self.week_label
    }

    /// Inputs for a product, if tracked.
    #[must_use]
    pub fn entry(&self, id: ProductId) -> Option<&InputFields> {
        self.entries.get(&id)
    }

    /// Inputs for a product, all zero if untracked.
    #[must_use]
    pub fn inputs(&self, id: ProductId) -> InputFields {
        self.entries.get(&id).copied().unwrap_or_default()
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (ProductId, &InputFields)> {
        self.entries.iter().map(|(id, fields)| (*id, fields))
    }

    /// Number of tracked products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no products are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn set_field(
        &mut self,
        id: ProductId,
        field: InputField,
        value: Decimal,
    ) -> Result<(), StoreError> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(StoreError::UnknownProduct(id))?;
        entry.set(field, value);
        Ok(())
    }
}

/// Serialized shape of a [`WeekStore`], checked before use.
#[derive(Deserialize)]
struct RawWeekStore {
    weeks: Vec<WeekSnapshot>,
    current: usize,
}

/// Append-only sequence of weeks with a movable cursor.
///
/// Always holds at least one week, and the cursor always points at one.
/// All mutation goes through `&mut self`, so a store has a single writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWeekStore")]
pub struct WeekStore {
    weeks: Vec<WeekSnapshot>,
    current: usize,
}

impl TryFrom<RawWeekStore> for WeekStore {
    type Error = StoreError;

    fn try_from(raw: RawWeekStore) -> Result<Self, Self::Error> {
        if raw.weeks.is_empty() {
            return Err(StoreError::Empty);
        }
        if raw.current >= raw.weeks.len() {
            return Err(StoreError::OutOfBounds {
                index: raw.current,
                len: raw.weeks.len(),
            });
        }
        Ok(Self {
            weeks: raw.weeks,
            current: raw.current,
        })
    }
}

impl WeekStore {
    /// A store seeded with one blank week.
    #[must_use]
    pub fn new(catalog: &Catalog, first_label: impl Into<String>) -> Self {
        Self {
            weeks: vec![WeekSnapshot::blank(catalog, first_label)],
            current: 0,
        }
    }

    /// The week under the cursor.
    #[must_use]
    pub fn current(&self) -> &WeekSnapshot {
        self.weeks
            .get(self.current)
            .expect("week store cursor always points at a stored week")
    }

    fn current_mut(&mut self) -> &mut WeekSnapshot {
        self.weeks
            .get_mut(self.current)
            .expect("week store cursor always points at a stored week")
    }

    /// Zero-based position of the cursor.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Number of weeks stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    /// Always false; a store is created with one week.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// Returns true if the cursor is on the most recently appended week.
    #[must_use]
    pub fn is_latest(&self) -> bool {
        self.current + 1 == self.weeks.len()
    }

    /// All weeks, oldest first.
    #[must_use]
    pub fn weeks(&self) -> &[WeekSnapshot] {
        &self.weeks
    }

    /// Set one input of the current week from raw text.
    ///
    /// Empty or non-numeric text is stored as zero; see [`parse_quantity`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownProduct`] if the current week doesn't
    /// track `id`.
    pub fn set_input(
        &mut self,
        id: ProductId,
        field: InputField,
        raw: &str,
    ) -> Result<Decimal, StoreError> {
        let value = parse_quantity(raw);
        tracing::debug!(product = %id, %field, raw, %value, "Parsed raw input");
        self.set_input_value(id, field, value)?;
        Ok(value)
    }

    /// Set one input of the current week to an already numeric value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownProduct`] if the current week doesn't
    /// track `id`.
    pub fn set_input_value(
        &mut self,
        id: ProductId,
        field: InputField,
        value: Decimal,
    ) -> Result<(), StoreError> {
        let week = self.current;
        self.current_mut().set_field(id, field, value)?;
        tracing::debug!(week, product = %id, %field, %value, "Input updated");
        Ok(())
    }

    /// Relabel the current week. Has no effect on derived values.
    pub fn rename_current(&mut self, label: impl Into<String>) {
        self.current_mut().week_label = label.into();
    }

    /// Push a week built by a transition and move the cursor to it.
    ///
    /// Returns the new week's index.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Empty`] if there is no week to follow on from.
    pub fn append_from_transition(&mut self, next: WeekSnapshot) -> Result<usize, StoreError> {
        if self.weeks.is_empty() {
            return Err(StoreError::Empty);
        }
        self.weeks.push(next);
        self.current = self.weeks.len() - 1;
        tracing::debug!(week = self.current, "Week appended");
        Ok(self.current)
    }

    /// Move the cursor to `index`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OutOfBounds`] and leaves the cursor where it was
    /// if `index` isn't a stored week.
    pub fn select(&mut self, index: usize) -> Result<usize, StoreError> {
        if index >= self.weeks.len() {
            return Err(StoreError::OutOfBounds {
                index,
                len: self.weeks.len(),
            });
        }
        self.current = index;
        Ok(index)
    }

    /// Move the cursor one week back.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OutOfBounds`] when already on the first week.
    pub fn previous(&mut self) -> Result<usize, StoreError> {
        let index = self.current.checked_sub(1).ok_or(StoreError::OutOfBounds {
            index: self.current,
            len: self.weeks.len(),
        })?;
        self.select(index)
    }

    /// Move the cursor one week forward.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OutOfBounds`] when already on the last week.
    pub fn next(&mut self) -> Result<usize, StoreError> {
        self.select(self.current + 1)
    }

    /// Add zero entries for catalog products a stored week doesn't track.
    ///
    /// Used after loading saved state against a catalog that has grown.
    /// Returns the number of entries added across all weeks.
    pub fn align_to(&mut self, catalog: &Catalog) -> usize {
        let mut added = 0;
        for week in &mut self.weeks {
            for product in catalog.products() {
                if !week.entries.contains_key(&product.id) {
                    week.entries.insert(product.id, InputFields::default());
                    added += 1;
                }
            }
        }
        if added > 0 {
            tracing::info!(added, "Added entries for new catalog products");
        }
        added
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::tests::{bundle, item};

    fn catalog() -> Catalog {
        Catalog::new(vec![item(1, 6), item(2, 8), bundle(3, &[1, 2], 2)]).unwrap()
    }

    #[test]
    fn test_new_store_has_one_blank_week() {
        let store = WeekStore::new(&catalog(), "WC 20/10");
        assert_eq!(store.len(), 1);
        assert_eq!(store.current_index(), 0);
        assert!(store.is_latest());
        assert_eq!(store.current().label(), "WC 20/10");
        assert_eq!(store.current().len(), 3);
        for (_, fields) in store.current().entries() {
            assert_eq!(*fields, InputFields::default());
        }
    }

    #[test]
    fn test_set_input_parses_raw_text() {
        let mut store = WeekStore::new(&catalog(), "W1");
        let id = ProductId::new(1);

        let stored = store.set_input(id, InputField::OurStock, "100").unwrap();
        assert_eq!(stored, Decimal::from(100));
        store.set_input(id, InputField::Sending, "-2.5").unwrap();
        store.set_input(id, InputField::Making, "lots").unwrap();

        let fields = store.current().inputs(id);
        assert_eq!(fields.our_stock, Decimal::from(100));
        assert_eq!(fields.sending, Decimal::new(-25, 1));
        assert_eq!(fields.making, Decimal::ZERO);
    }

    #[test]
    fn test_set_input_touches_one_pair() {
        let mut store = WeekStore::new(&catalog(), "W1");
        store.set_input(ProductId::new(2), InputField::ThplStock, "40").unwrap();

        assert_eq!(store.current().inputs(ProductId::new(1)), InputFields::default());
        let fields = store.current().inputs(ProductId::new(2));
        assert_eq!(fields.thpl_stock, Decimal::from(40));
        assert_eq!(fields.our_stock, Decimal::ZERO);
        assert_eq!(fields.estimated_sales, Decimal::ZERO);
    }

    #[test]
    fn test_set_input_unknown_product() {
        let mut store = WeekStore::new(&catalog(), "W1");
        let err = store.set_input(ProductId::new(99), InputField::Making, "1").unwrap_err();
        assert_eq!(err, StoreError::UnknownProduct(ProductId::new(99)));
    }

    #[test]
    fn test_rename_current() {
        let mut store = WeekStore::new(&catalog(), "W1");
        store.rename_current("WC 27/10");
        assert_eq!(store.current().label(), "WC 27/10");
    }

    #[test]
    fn test_append_moves_cursor() {
        let catalog = catalog();
        let mut store = WeekStore::new(&catalog, "W1");
        let index = store
            .append_from_transition(WeekSnapshot::blank(&catalog, "W2"))
            .unwrap();
        assert_eq!(index, 1);
        assert_eq!(store.current_index(), 1);
        assert_eq!(store.current().label(), "W2");
        assert!(store.is_latest());
    }

    #[test]
    fn test_navigation_does_not_clamp() {
        let catalog = catalog();
        let mut store = WeekStore::new(&catalog, "W1");
        store.append_from_transition(WeekSnapshot::blank(&catalog, "W2")).unwrap();

        assert_eq!(
            store.next(),
            Err(StoreError::OutOfBounds { index: 2, len: 2 })
        );
        assert_eq!(store.current_index(), 1);

        assert_eq!(store.previous().unwrap(), 0);
        assert!(!store.is_latest());
        assert!(store.previous().is_err());
        assert_eq!(store.current_index(), 0);

        assert!(store.select(5).is_err());
        assert_eq!(store.select(1).unwrap(), 1);
    }

    #[test]
    fn test_navigation_keeps_data() {
        let catalog = catalog();
        let mut store = WeekStore::new(&catalog, "W1");
        store.set_input(ProductId::new(1), InputField::Making, "5").unwrap();
        store.append_from_transition(WeekSnapshot::blank(&catalog, "W2")).unwrap();
        store.previous().unwrap();
        assert_eq!(store.current().inputs(ProductId::new(1)).making, Decimal::from(5));
    }

    #[test]
    fn test_edits_apply_to_selected_week() {
        let catalog = catalog();
        let mut store = WeekStore::new(&catalog, "W1");
        store.append_from_transition(WeekSnapshot::blank(&catalog, "W2")).unwrap();
        store.select(0).unwrap();
        store.set_input(ProductId::new(2), InputField::Sending, "3").unwrap();

        assert_eq!(store.weeks()[0].inputs(ProductId::new(2)).sending, Decimal::from(3));
        assert_eq!(store.weeks()[1].inputs(ProductId::new(2)).sending, Decimal::ZERO);
    }

    #[test]
    fn test_input_field_spellings() {
        assert_eq!("ourStock".parse::<InputField>().unwrap(), InputField::OurStock);
        assert_eq!("thpl_stock".parse::<InputField>().unwrap(), InputField::ThplStock);
        assert_eq!("estimated-sales".parse::<InputField>().unwrap(), InputField::EstimatedSales);
        assert!("price".parse::<InputField>().is_err());
        for field in InputField::ALL {
            assert_eq!(field.to_string().parse::<InputField>().unwrap(), field);
        }
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut store = WeekStore::new(&catalog(), "W1");
        store.set_input(ProductId::new(1), InputField::OurStock, "12.5").unwrap();

        let json = serde_json::to_string(&store).unwrap();
        let loaded: WeekStore = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_deserialize_rejects_empty_store() {
        let json = r#"{"weeks": [], "current": 0}"#;
        assert!(serde_json::from_str::<WeekStore>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_bad_cursor() {
        let store = WeekStore::new(&catalog(), "W1");
        let mut value = serde_json::to_value(&store).unwrap();
        value["current"] = serde_json::json!(3);
        assert!(serde_json::from_value::<WeekStore>(value).is_err());
    }

    #[test]
    fn test_align_to_adds_missing_products() {
        let small = Catalog::new(vec![item(1, 6)]).unwrap();
        let mut store = WeekStore::new(&small, "W1");
        assert_eq!(store.align_to(&catalog()), 2);
        assert_eq!(store.current().len(), 3);
        assert_eq!(store.align_to(&catalog()), 0);
    }
}
