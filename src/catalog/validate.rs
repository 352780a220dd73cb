//! Catalog validation that reports every problem at once.

use crate::core::{Namespace, StepDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A structural problem in a country's step catalog.
///
/// Equal `order` values are not a violation; ties keep catalog order.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogViolation {
    #[error("Country code '{code}' is empty or contains '_'")]
    InvalidCountryCode { code: String },

    #[error("Step at order {order} has an empty id")]
    EmptyId { order: i32 },

    #[error("Step id '{id}' appears more than once")]
    DuplicateId { id: String },

    #[error("Step '{id}' belongs to '{found}', expected '{expected}'")]
    CountryMismatch {
        id: String,
        expected: String,
        found: String,
    },
}

/// Validate one country's catalog, accumulating ALL violations.
///
/// # Example
///
/// ```rust
/// use stepgate::catalog::validate_catalog;
/// use stepgate::core::StepDefinition;
///
/// let steps = vec![
///     StepDefinition::new("cf", 10, "IT"),
///     StepDefinition::new("cf", 20, "MX"),
/// ];
///
/// let result = validate_catalog("IT", &steps);
/// assert!(result.is_failure());
/// ```
pub fn validate_catalog(
    country_code: &str,
    steps: &[StepDefinition],
) -> Validation<(), NonEmptyVec<CatalogViolation>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<CatalogViolation>>> = Vec::new();
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();

    if !Namespace::is_valid_country_code(country_code) {
        checks.push(Validation::fail(CatalogViolation::InvalidCountryCode {
            code: country_code.to_string(),
        }));
    }

    for step in steps {
        if step.id.trim().is_empty() {
            checks.push(Validation::fail(CatalogViolation::EmptyId { order: step.order }));
        } else if !seen.insert(step.id.as_str()) && reported.insert(step.id.as_str()) {
            checks.push(Validation::fail(CatalogViolation::DuplicateId {
                id: step.id.clone(),
            }));
        }

        if step.country_code != country_code {
            checks.push(Validation::fail(CatalogViolation::CountryMismatch {
                id: step.id.clone(),
                expected: country_code.to_string(),
                found: step.country_code.clone(),
            }));
        }
    }

    if checks.is_empty() {
        return Validation::success(());
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Flatten a validation result into a plain list of violations.
pub fn violations(result: Validation<(), NonEmptyVec<CatalogViolation>>) -> Vec<CatalogViolation> {
    match result {
        Validation::Success(_) => Vec::new(),
        Validation::Failure(errors) => errors.iter().cloned().collect(),
    }
}
