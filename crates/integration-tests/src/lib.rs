//! Integration tests for the stock planner.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p stock-planner-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `planner_rollover` - Multi-week planning against the bundled catalog
//! - `catalog_files` - Custom catalogs, validation and resuming saved plans
