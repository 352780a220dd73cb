//! Catalog loading errors.

use super::validate::CatalogViolation;
use thiserror::Error;

/// Errors that can occur when loading a step catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(String),

    #[error("Catalog for '{country}' has {} violation(s)", violations.len())]
    Invalid {
        country: String,
        violations: Vec<CatalogViolation>,
    },
}
