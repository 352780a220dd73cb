//! Runtime configuration loaded from TOML.

use crate::core::{Namespace, DEFAULT_TEMPLATE_VERSION};
use crate::store::SnapshotFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Where completion state is persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Snapshot file; in-memory storage when absent
    pub path: Option<PathBuf>,
    pub format: SnapshotFormat,
}

/// Settings for assembling a [`StepStateManager`](crate::StepStateManager).
///
/// Every field has a default, so an empty document is a valid config.
///
/// # Example
///
/// ```rust
/// use stepgate::Config;
///
/// let config = Config::from_toml_str(r#"
///     default_country = "MX"
///
///     [storage]
///     path = "state.json"
/// "#).unwrap();
///
/// assert_eq!(config.default_country, "MX");
/// assert_eq!(config.template_version, 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bump when the catalog changes incompatibly
    pub template_version: u32,
    /// Country whose namespace is active at startup
    pub default_country: String,
    pub storage: StorageConfig,
    /// TOML catalog file; built-in catalogs when absent
    pub catalog_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_version: DEFAULT_TEMPLATE_VERSION,
            default_country: "IT".to_string(),
            storage: StorageConfig::default(),
            catalog_path: None,
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    ///
    /// Relative `storage.path` and `catalog_path` values are resolved
    /// against the directory holding the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        Ok(match path.parent() {
            Some(base) => config.relative_to(base),
            None => config,
        })
    }

    /// Anchor relative paths at `base`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        let anchor = |path: PathBuf| {
            if path.is_relative() {
                base.join(path)
            } else {
                path
            }
        };
        self.storage.path = self.storage.path.map(anchor);
        self.catalog_path = self.catalog_path.map(anchor);
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_country.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_country must not be empty".to_string(),
            ));
        }
        if !Namespace::is_valid_country_code(&self.default_country) {
            return Err(ConfigError::Invalid(format!(
                "default_country '{}' must not contain '_'",
                self.default_country
            )));
        }
        Ok(())
    }
}
