//! Unified error handling for the CLI.

use std::path::PathBuf;

use stock_planner_core::{CatalogError, PlannerError};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can end a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The catalog is malformed; planning against it is refused.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A planner operation was rejected.
    #[error("{0}")]
    Planner(#[from] PlannerError),

    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the terminal failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// The state file is not valid plan JSON.
    #[error("State file {path} is invalid: {source}")]
    InvalidState {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON rendering failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `init` would overwrite an existing plan.
    #[error("State file {0} already exists; pass --force to start over")]
    StateExists(PathBuf),

    /// A command needs a plan that hasn't been created.
    #[error("State file {0} not found; run `sp-cli init` first")]
    StateMissing(PathBuf),

    /// The product ID isn't in the catalog.
    #[error("Unknown product ID: {0}")]
    UnknownProduct(String),

    /// The field name isn't one of the editable inputs.
    #[error("{0}. Valid fields: our_stock, making, sending, thpl_stock, estimated_sales")]
    InvalidField(String),

    /// Week numbers are 1-based.
    #[error("Week numbers start at 1")]
    InvalidWeekNumber,
}
