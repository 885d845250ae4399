//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SP_STATE_PATH` - Plan state file (default: planner-state.json)
//! - `SP_CATALOG_PATH` - Catalog YAML file (default: the bundled catalog)
//! - `SP_LOG_FORMAT` - Log output format, `text` or `json` (default: text)
//! - `RUST_LOG` - Log filter (default: info)
//!
//! Command-line flags take precedence over the environment.

use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_STATE_PATH: &str = "planner-state.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `text` or `json`, got `{other}`")),
        }
    }
}

/// Resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Where the plan state is read from and written to.
    pub state_path: PathBuf,
    /// Catalog file, or `None` for the bundled catalog.
    pub catalog_path: Option<PathBuf>,
    /// Log output format.
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let state_path = PathBuf::from(get_env_or_default("SP_STATE_PATH", DEFAULT_STATE_PATH));
        let catalog_path = get_optional_env("SP_CATALOG_PATH").map(PathBuf::from);
        let log_format = get_optional_env("SP_LOG_FORMAT")
            .map(|value| {
                value
                    .parse::<LogFormat>()
                    .map_err(|e| ConfigError::InvalidEnvVar("SP_LOG_FORMAT".to_string(), e))
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            state_path,
            catalog_path,
            log_format,
        })
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, state: Option<PathBuf>, catalog: Option<PathBuf>) -> Self {
        if let Some(state) = state {
            self.state_path = state;
        }
        if catalog.is_some() {
            self.catalog_path = catalog;
        }
        self
    }
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> CliConfig {
        CliConfig {
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            catalog_path: None,
            log_format: LogFormat::Text,
        }
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" TEXT ".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = config().with_overrides(
            Some(PathBuf::from("plan.json")),
            Some(PathBuf::from("catalog.yaml")),
        );
        assert_eq!(config.state_path, PathBuf::from("plan.json"));
        assert_eq!(config.catalog_path, Some(PathBuf::from("catalog.yaml")));
    }

    #[test]
    fn test_missing_overrides_keep_config() {
        let mut base = config();
        base.catalog_path = Some(PathBuf::from("env.yaml"));
        let config = base.with_overrides(None, None);
        assert_eq!(config.state_path, PathBuf::from(DEFAULT_STATE_PATH));
        assert_eq!(config.catalog_path, Some(PathBuf::from("env.yaml")));
    }
}
