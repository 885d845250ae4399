//! Catalog inspection commands.
//!
//! # Usage
//!
//! ```bash
//! # Validate a catalog file, reporting every problem found
//! sp-cli catalog validate ./catalog.yaml
//!
//! # List the products of the configured catalog
//! sp-cli catalog list
//! ```

use std::io::Write;
use std::path::Path;

use stock_planner_core::{Catalog, CatalogError};
use tracing::{error, info};

use crate::commands::state;
use crate::config::CliConfig;
use crate::error::CliError;
use crate::render;

/// Validate a catalog file, or the configured catalog if no path is given.
///
/// # Errors
///
/// Returns [`CliError::Catalog`] if validation fails, after logging each
/// problem.
pub async fn validate(config: &CliConfig, path: Option<&Path>) -> Result<(), CliError> {
    let result = match path.or(config.catalog_path.as_deref()) {
        Some(path) => {
            info!(path = %path.display(), "Validating catalog");
            let yaml = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CliError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
            Catalog::from_yaml_str(&yaml)
        }
        None => Catalog::standard(),
    };

    match result {
        Ok(catalog) => {
            let bundles = catalog.products().filter(|p| p.is_bundle).count();
            info!(products = catalog.len(), bundles, "Catalog is valid");
            Ok(())
        }
        Err(e) => {
            report(&e);
            Err(e.into())
        }
    }
}

fn report(e: &CatalogError) {
    error!("Catalog validation failed: {e}");
    for problem in e.problems() {
        error!("  - {problem}");
    }
}

/// Print every product of the configured catalog.
///
/// # Errors
///
/// Returns an error if the catalog can't be loaded or stdout is closed.
pub async fn list(config: &CliConfig) -> Result<(), CliError> {
    let catalog = state::load_catalog(config).await?;
    let mut out = std::io::stdout().lock();
    render::catalog(&mut out, &catalog)?;
    out.flush()?;
    Ok(())
}
