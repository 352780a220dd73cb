//! Step catalogs: where each country's checklist comes from.
//!
//! The check store and the sequencing policy never validate step ids; the
//! catalog is the source of truth for which steps exist and in what order.

mod builtin;
mod country;
pub mod error;
mod toml_catalog;
mod validate;

pub use builtin::BuiltinCatalog;
pub use country::{available_countries, find_country, CountryInfo};
pub use error::CatalogError;
pub use toml_catalog::TomlCatalog;
pub use validate::{validate_catalog, violations, CatalogViolation};

use crate::core::StepDefinition;

/// Provider of per-country step lists.
pub trait StepCatalog {
    /// Steps for `country_code`, in catalog order. Unknown countries have
    /// no steps.
    fn steps_for_country(&self, country_code: &str) -> Vec<StepDefinition>;
}

impl<C: StepCatalog + ?Sized> StepCatalog for Box<C> {
    fn steps_for_country(&self, country_code: &str) -> Vec<StepDefinition> {
        (**self).steps_for_country(country_code)
    }
}
