//! Stock Planner Core - weekly two-location stock engine.
//!
//! This crate tracks food products held at our own warehouse and at a
//! third-party fulfillment provider (3PL) across weekly planning periods:
//! - what each location holds at the end of the week
//! - how much 3PL demand bundle sales place on their component products
//! - how many days of cover the 3PL has left, and whether that's a problem
//! - what the next week opens with
//!
//! # Architecture
//!
//! The core crate contains only types and pure computation - no I/O and no
//! presentation. Front ends (the `sp-cli` binary, for one) own a
//! [`Planner`], feed it raw field edits and render the [`WeekView`] it
//! derives.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, categories, stock status and quantity parsing
//! - [`catalog`] - Product registry with the bundle → component index
//! - [`week`] - Editable week snapshots and the append-only week store
//! - [`derive`] - Per-week derivation engine
//! - [`status`] - Days-of-cover classification and alert aggregation
//! - [`transition`] - Week rollover and the [`Planner`] facade

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod derive;
pub mod status;
pub mod transition;
pub mod types;
pub mod week;

pub use catalog::{BundleRecipe, Catalog, CatalogError, CatalogProblem, Product};
pub use derive::{CategoryGroup, DerivedMetrics, ProductView, WeekView, derive_week};
pub use status::{AlertEntry, StockAlerts, classify};
pub use transition::{Planner, PlannerError, build_next_snapshot, default_week_label};
pub use types::*;
pub use week::{InputField, InputFields, StoreError, WeekSnapshot, WeekStore};
