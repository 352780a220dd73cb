//! Step definitions for country checklists.
//!
//! A step is an immutable catalog entry. The sequencing logic only looks at
//! `id` and `order`; the descriptive fields are carried for display.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of a step, unique within one country's catalog.
pub type StepId = String;

/// One entry of a country's onboarding checklist.
///
/// Steps are never mutated by the sequencing policy. Their position in the
/// checklist comes from `order`; equal orders keep catalog insertion order.
///
/// # Example
///
/// ```rust
/// use stepgate::core::StepDefinition;
///
/// let step = StepDefinition::new("codice-fiscale", 10, "IT")
///     .with_title("Codice Fiscale")
///     .with_subtitle("Required for opening a bank account.");
///
/// assert_eq!(step.id, "codice-fiscale");
/// assert_eq!(step.order, 10);
/// assert_eq!(step.formatted_date(), "");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepDefinition {
    /// Stable identifier, used as the persisted key suffix
    pub id: StepId,
    /// Canonical sequence position
    pub order: i32,
    /// Country whose catalog this step belongs to
    pub country_code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub detail: Option<String>,
    /// Suggested completion date, if any
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl StepDefinition {
    /// Create a step with empty descriptive fields.
    pub fn new(id: impl Into<StepId>, order: i32, country_code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            order,
            country_code: country_code.into(),
            title: String::new(),
            subtitle: String::new(),
            detail: None,
            due_date: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Render the due date as `dd mon` in lower case, e.g. `"03 nov"`.
    ///
    /// Returns an empty string when the step has no due date.
    pub fn formatted_date(&self) -> String {
        match self.due_date {
            Some(date) => date.format("%d %b").to_string().to_lowercase(),
            None => String::new(),
        }
    }
}
