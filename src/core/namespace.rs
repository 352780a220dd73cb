//! Completion-record namespaces.
//!
//! Every completion flag is scoped to a `(template_version, country_code)`
//! pair, so switching country or bumping the catalog version never reads
//! another namespace's records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Template version used when none is given.
pub const DEFAULT_TEMPLATE_VERSION: u32 = 1;

/// Prefix shared by every persisted completion key.
pub const CHECKSTATE_PREFIX: &str = "checkstate_";

/// Scope of a set of completion records.
///
/// Key parts are joined with `_`, so a country code containing `_` could
/// produce the same key as another namespace. Catalogs and configuration
/// reject such codes; see [`Namespace::is_valid_country_code`].
///
/// # Example
///
/// ```rust
/// use stepgate::core::Namespace;
///
/// let ns = Namespace::for_country("IT");
/// assert_eq!(ns.template_version, 1);
/// assert_eq!(ns.key_for("codice-fiscale"), "checkstate_v1_IT_codice-fiscale");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace {
    pub template_version: u32,
    pub country_code: String,
}

impl Namespace {
    pub fn new(country_code: impl Into<String>, template_version: u32) -> Self {
        Self {
            template_version,
            country_code: country_code.into(),
        }
    }

    /// Non-empty and free of the `_` key separator.
    pub fn is_valid_country_code(code: &str) -> bool {
        !code.trim().is_empty() && !code.contains('_')
    }

    /// Namespace for a country at [`DEFAULT_TEMPLATE_VERSION`].
    pub fn for_country(country_code: impl Into<String>) -> Self {
        Self::new(country_code, DEFAULT_TEMPLATE_VERSION)
    }

    /// Prefix of every key in this namespace.
    pub fn key_prefix(&self) -> String {
        format!(
            "{}v{}_{}_",
            CHECKSTATE_PREFIX, self.template_version, self.country_code
        )
    }

    /// Storage key of a step's completion flag.
    pub fn key_for(&self, step_id: &str) -> String {
        format!("{}{}", self.key_prefix(), step_id)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}/{}", self.template_version, self.country_code)
    }
}
