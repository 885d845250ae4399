//! Loading and saving the plan state file.
//!
//! The core store is serializable; this module is the only place it touches
//! disk. Writes go to a sibling temp file first and are renamed into place so
//! an interrupted save never leaves a truncated plan behind.

use std::path::Path;

use stock_planner_core::{Catalog, Planner, WeekStore};
use tracing::{debug, info};

use crate::config::CliConfig;
use crate::error::CliError;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CliError + '_ {
    move |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Load the configured catalog, or the bundled one.
///
/// # Errors
///
/// Returns an error if the catalog file can't be read or fails validation.
pub async fn load_catalog(config: &CliConfig) -> Result<Catalog, CliError> {
    let Some(path) = config.catalog_path.as_deref() else {
        debug!("Using bundled catalog");
        return Ok(Catalog::standard()?);
    };

    info!(path = %path.display(), "Loading catalog");
    let yaml = tokio::fs::read_to_string(path)
        .await
        .map_err(io_error(path))?;
    Ok(Catalog::from_yaml_str(&yaml)?)
}

/// Returns true if a plan has been saved at `path`.
///
/// # Errors
///
/// Returns an error if the file system can't be queried.
pub async fn plan_exists(path: &Path) -> Result<bool, CliError> {
    tokio::fs::try_exists(path).await.map_err(io_error(path))
}

/// Load the catalog and the saved week store.
///
/// # Errors
///
/// Returns [`CliError::StateMissing`] if no plan has been saved, or an error
/// if either file is unreadable or invalid.
pub async fn load_planner(config: &CliConfig) -> Result<Planner, CliError> {
    let catalog = load_catalog(config).await?;
    let path = config.state_path.as_path();

    if !plan_exists(path).await? {
        return Err(CliError::StateMissing(path.to_path_buf()));
    }

    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(io_error(path))?;
    let store: WeekStore =
        serde_json::from_str(&json).map_err(|source| CliError::InvalidState {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), weeks = store.len(), "Loaded plan");
    Ok(Planner::resume(catalog, store))
}

/// Write the planner's week store to `path`.
///
/// # Errors
///
/// Returns an error if the file can't be written.
pub async fn save_planner(path: &Path, planner: &Planner) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(planner.store())?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    tokio::fs::write(tmp, json).await.map_err(io_error(tmp))?;
    tokio::fs::rename(tmp, path).await.map_err(io_error(path))?;

    debug!(path = %path.display(), weeks = planner.store().len(), "Saved plan");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use stock_planner_core::{InputField, ProductId};

    use super::*;
    use crate::config::LogFormat;

    fn config(dir: &Path) -> CliConfig {
        CliConfig {
            state_path: dir.join("plan.json"),
            catalog_path: None,
            log_format: LogFormat::Text,
        }
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        let mut planner = Planner::new(Catalog::standard().unwrap(), "WC 20/10");
        planner
            .set_input(ProductId::new(13), InputField::OurStock, "100")
            .unwrap();
        planner.advance_week().unwrap();
        save_planner(&config.state_path, &planner).await.unwrap();

        let loaded = load_planner(&config).await.unwrap();
        assert_eq!(loaded.store(), planner.store());
        assert!(!dir.path().join("plan.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_missing_state() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_planner(&config(dir.path())).await.unwrap_err();
        assert!(matches!(err, CliError::StateMissing(_)));
    }

    #[tokio::test]
    async fn test_corrupt_state() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        tokio::fs::write(&config.state_path, r#"{"weeks": [], "current": 0}"#)
            .await
            .unwrap();

        let err = load_planner(&config).await.unwrap_err();
        assert!(matches!(err, CliError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_invalid_catalog_file_refused() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("catalog.yaml");
        tokio::fs::write(
            &catalog_path,
            "- id: 1\n  name: Box\n  category: bundles\n  is_bundle: true\n  bundle_contents: [2]\n",
        )
        .await
        .unwrap();

        let mut config = config(dir.path());
        config.catalog_path = Some(catalog_path);
        let err = load_catalog(&config).await.unwrap_err();
        assert!(matches!(err, CliError::Catalog(_)));
    }

    #[tokio::test]
    async fn test_missing_catalog_file() {
        let mut config = config(Path::new("."));
        config.catalog_path = Some(PathBuf::from("/nonexistent/catalog.yaml"));
        let err = load_catalog(&config).await.unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
