//! Checklists shipped with the crate.

use super::StepCatalog;
use crate::core::StepDefinition;
use chrono::{Days, NaiveDate, Utc};

/// Built-in Italy and Mexico checklists.
///
/// Due dates are placed relative to an anchor day, today by default.
#[derive(Clone, Debug)]
pub struct BuiltinCatalog {
    anchor: NaiveDate,
}

impl BuiltinCatalog {
    pub fn new() -> Self {
        Self::anchored(Utc::now().date_naive())
    }

    /// Catalog with due dates computed from `anchor` instead of today.
    pub fn anchored(anchor: NaiveDate) -> Self {
        Self { anchor }
    }

    fn offset(&self, days: i64) -> Option<NaiveDate> {
        let magnitude = Days::new(days.unsigned_abs());
        if days < 0 {
            self.anchor.checked_sub_days(magnitude)
        } else {
            self.anchor.checked_add_days(magnitude)
        }
    }

    fn step(
        &self,
        id: &str,
        order: i32,
        country_code: &str,
        title: &str,
        subtitle: &str,
        due_in_days: i64,
    ) -> StepDefinition {
        let step = StepDefinition::new(id, order, country_code)
            .with_title(title)
            .with_subtitle(subtitle);
        match self.offset(due_in_days) {
            Some(date) => step.with_due_date(date),
            None => step,
        }
    }

    fn italy(&self) -> Vec<StepDefinition> {
        vec![
            self.step(
                "codice-fiscale",
                10,
                "IT",
                "Codice Fiscale",
                "Required for opening a bank account and signing rental contracts...",
                -10,
            ),
            self.step(
                "permesso-soggiorno",
                20,
                "IT",
                "Permesso di Soggiorno",
                "Submit application within 8 days of arrival.",
                -4,
            ),
            self.step(
                "tessera-sanitaria",
                30,
                "IT",
                "Tessera Sanitaria",
                "Needed to access Italy's public healthcare system.",
                3,
            ),
        ]
    }

    fn mexico(&self) -> Vec<StepDefinition> {
        vec![
            self.step(
                "curp-registration",
                10,
                "MX",
                "CURP Registration",
                "Unique Population Registry Code required for most procedures...",
                -7,
            ),
            self.step(
                "temporal-resident-card",
                20,
                "MX",
                "Temporal Resident Card",
                "Must be collected within 30 days of arrival.",
                -1,
            ),
            self.step(
                "rfc-tax-id",
                30,
                "MX",
                "RFC Tax ID",
                "Required for employment and opening bank accounts.",
                5,
            ),
        ]
    }
}

impl Default for BuiltinCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl StepCatalog for BuiltinCatalog {
    fn steps_for_country(&self, country_code: &str) -> Vec<StepDefinition> {
        match country_code {
            "IT" => self.italy(),
            "MX" => self.mexico(),
            _ => Vec::new(),
        }
    }
}
