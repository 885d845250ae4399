//! Core types for the stock planner.
//!
//! This module provides type-safe wrappers for the planner's domain concepts.

pub mod category;
pub mod id;
pub mod quantity;
pub mod status;

pub use category::Category;
pub use id::*;
pub use quantity::parse_quantity;
pub use status::*;
