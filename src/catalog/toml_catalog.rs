//! Catalogs loaded from TOML files.

use super::error::CatalogError;
use super::validate::{validate_catalog, violations};
use super::StepCatalog;
use crate::core::StepDefinition;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    steps: Vec<StepDefinition>,
}

/// Step catalogs for any number of countries, read from TOML.
///
/// Each `[[steps]]` table is one [`StepDefinition`]; steps are grouped by
/// their `country_code` and every group is validated on load.
///
/// # Example
///
/// ```rust
/// use stepgate::catalog::{StepCatalog, TomlCatalog};
///
/// let catalog = TomlCatalog::from_toml_str(r#"
///     [[steps]]
///     id = "visa"
///     order = 10
///     country_code = "ES"
///     title = "Student visa"
///     due_date = "2025-11-03"
/// "#).unwrap();
///
/// let steps = catalog.steps_for_country("ES");
/// assert_eq!(steps.len(), 1);
/// assert_eq!(steps[0].formatted_date(), "03 nov");
/// ```
#[derive(Clone, Debug, Default)]
pub struct TomlCatalog {
    by_country: BTreeMap<String, Vec<StepDefinition>>,
}

impl TomlCatalog {
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            toml::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;

        let mut by_country: BTreeMap<String, Vec<StepDefinition>> = BTreeMap::new();
        for step in file.steps {
            by_country
                .entry(step.country_code.clone())
                .or_default()
                .push(step);
        }

        for (country, steps) in &by_country {
            let found = violations(validate_catalog(country, steps));
            if !found.is_empty() {
                return Err(CatalogError::Invalid {
                    country: country.clone(),
                    violations: found,
                });
            }
        }

        Ok(Self { by_country })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&content)?;
        info!(
            path = %path.display(),
            countries = catalog.by_country.len(),
            "loaded step catalog"
        );
        Ok(catalog)
    }

    /// Country codes with at least one step.
    pub fn countries(&self) -> Vec<&str> {
        self.by_country.keys().map(String::as_str).collect()
    }
}

impl StepCatalog for TomlCatalog {
    fn steps_for_country(&self, country_code: &str) -> Vec<StepDefinition> {
        self.by_country
            .get(country_code)
            .cloned()
            .unwrap_or_default()
    }
}
