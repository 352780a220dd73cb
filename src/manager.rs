//! Facade that ties the active country's catalog to its completion state.

use crate::catalog::{BuiltinCatalog, CatalogError, CountryInfo, StepCatalog, TomlCatalog};
use crate::config::{Config, ConfigError};
use crate::core::{
    can_toggle_step, is_step_active, sorted_steps, visible_steps_for_home, ChangeEvent,
    Namespace, Progress, SequencingState, StepDefinition, StepId,
};
use crate::onboarding::{self, OnboardingError};
use crate::store::{
    CheckStateStore, FileStore, KeyValueStore, MemoryStore, StoreError, SubscriptionId,
};
use thiserror::Error;
use tracing::{info, warn};

/// Errors from a guarded toggle.
#[derive(Debug, Error)]
pub enum ToggleError {
    #[error("Step '{step_id}' is not in the '{country}' checklist")]
    UnknownStep { step_id: StepId, country: String },

    #[error("Complete previous step '{previous}' before '{step_id}'")]
    PreviousStepIncomplete { step_id: StepId, previous: StepId },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from assembling a manager out of a [`Config`].
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Owned per-step view for rendering a checklist.
#[derive(Clone, Debug, PartialEq)]
pub struct StepView {
    pub step: StepDefinition,
    pub done: bool,
    pub can_toggle: bool,
    pub is_active: bool,
}

/// Manager assembled from configuration, with boxed backend and catalog.
pub type DynStepStateManager =
    StepStateManager<Box<dyn KeyValueStore>, Box<dyn StepCatalog>>;

/// Shared step state for every view of the checklist.
///
/// The active country is the country of the check store's namespace.
///
/// # Example
///
/// ```rust
/// use stepgate::catalog::BuiltinCatalog;
/// use stepgate::store::MemoryStore;
/// use stepgate::StepStateManager;
///
/// let mut manager = StepStateManager::new(MemoryStore::new(), BuiltinCatalog::new(), "IT", 1);
///
/// assert!(manager.can_toggle_step("codice-fiscale"));
/// assert!(!manager.can_toggle_step("permesso-soggiorno"));
///
/// manager.toggle("codice-fiscale").unwrap();
/// assert!(manager.is_step_active("permesso-soggiorno"));
/// ```
pub struct StepStateManager<B: KeyValueStore, C: StepCatalog> {
    store: CheckStateStore<B>,
    catalog: C,
}

impl<B: KeyValueStore, C: StepCatalog> StepStateManager<B, C> {
    pub fn new(backend: B, catalog: C, country_code: &str, template_version: u32) -> Self {
        Self {
            store: CheckStateStore::new(backend, Namespace::new(country_code, template_version)),
            catalog,
        }
    }

    pub fn current_country(&self) -> &str {
        &self.store.namespace().country_code
    }

    pub fn namespace(&self) -> &Namespace {
        self.store.namespace()
    }

    pub fn store(&self) -> &CheckStateStore<B> {
        &self.store
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Make `country_code` at `template_version` the active namespace.
    ///
    /// Returns `false`, without notifying, when nothing changes.
    pub fn update_country(&mut self, country_code: &str, template_version: u32) -> bool {
        let switched = self.store.switch_namespace(country_code, template_version);
        if switched {
            info!(namespace = %self.store.namespace(), "active checklist changed");
        }
        switched
    }

    pub fn is_done(&self, step_id: &str) -> bool {
        self.store.is_done(step_id)
    }

    pub fn set_done(&mut self, step_id: &str, done: bool) -> Result<(), StoreError> {
        self.store.set_done(step_id, done)
    }

    /// Flip a step without consulting the sequencing policy.
    pub fn toggle(&mut self, step_id: &str) -> Result<bool, StoreError> {
        self.store.toggle(step_id)
    }

    /// Flip a step only when the sequencing policy allows it.
    ///
    /// Returns the new value.
    pub fn try_toggle(&mut self, step_id: &str) -> Result<bool, ToggleError> {
        let steps = self.steps();
        let Some(index) = steps.iter().position(|step| step.id == step_id) else {
            warn!(step_id, country = self.current_country(), "toggle of unknown step");
            return Err(ToggleError::UnknownStep {
                step_id: step_id.to_string(),
                country: self.current_country().to_string(),
            });
        };

        if !can_toggle_step(&steps, step_id, &self.store) {
            let previous = steps[index - 1].id.clone();
            warn!(step_id, previous = %previous, "toggle refused, previous step incomplete");
            return Err(ToggleError::PreviousStepIncomplete {
                step_id: step_id.to_string(),
                previous,
            });
        }

        Ok(self.store.toggle(step_id)?)
    }

    /// The active country's checklist, sorted by order.
    pub fn steps(&self) -> Vec<StepDefinition> {
        let steps = self.catalog.steps_for_country(self.current_country());
        sorted_steps(&steps).into_iter().cloned().collect()
    }

    /// False for ids outside the active checklist.
    pub fn can_toggle_step(&self, step_id: &str) -> bool {
        let steps = self.steps();
        self.warn_if_unknown(&steps, step_id, "can_toggle_step");
        can_toggle_step(&steps, step_id, &self.store)
    }

    /// False for ids outside the active checklist.
    pub fn is_step_active(&self, step_id: &str) -> bool {
        let steps = self.steps();
        self.warn_if_unknown(&steps, step_id, "is_step_active");
        is_step_active(&steps, step_id, &self.store)
    }

    fn warn_if_unknown(&self, steps: &[StepDefinition], step_id: &str, query: &str) {
        if !steps.iter().any(|step| step.id == step_id) {
            warn!(step_id, query, country = self.current_country(), "lookup of unknown step");
        }
    }

    /// Window of at most three steps for the condensed home view.
    pub fn visible_steps_for_home(&self) -> Vec<StepDefinition> {
        let steps = self.steps();
        visible_steps_for_home(&steps, &self.store)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Status of every step of the active checklist, in order.
    pub fn statuses(&self) -> Vec<StepView> {
        let steps = self.steps();
        SequencingState::derive(&steps, &self.store)
            .statuses()
            .iter()
            .map(|status| StepView {
                step: status.step.clone(),
                done: status.done,
                can_toggle: status.can_toggle,
                is_active: status.is_active,
            })
            .collect()
    }

    pub fn active_step(&self) -> Option<StepDefinition> {
        let steps = self.steps();
        SequencingState::derive(&steps, &self.store)
            .active_step()
            .cloned()
    }

    pub fn progress(&self) -> Progress {
        let steps = self.steps();
        SequencingState::derive(&steps, &self.store).progress()
    }

    /// Clear every step of the active checklist in the active namespace.
    pub fn reset_current_country(&mut self) -> Result<(), StoreError> {
        let ids: Vec<StepId> = self.steps().into_iter().map(|step| step.id).collect();
        self.store.reset(ids)
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        self.store.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn selected_country(&self) -> Option<CountryInfo> {
        onboarding::selected_country(self.store.backend())
    }

    pub fn has_completed_onboarding(&self) -> bool {
        onboarding::has_completed_onboarding(self.store.backend())
    }

    /// Record the chosen country, finish onboarding, and activate its
    /// checklist at the current template version.
    pub fn select_country(&mut self, country_code: &str) -> Result<CountryInfo, OnboardingError> {
        let country = onboarding::select_country(self.store.backend_mut(), country_code)?;
        let version = self.store.namespace().template_version;
        self.update_country(&country.code, version);
        Ok(country)
    }

    /// Forget onboarding and every completion record in every namespace.
    ///
    /// Returns how many completion records were removed.
    pub fn reset_onboarding(&mut self) -> Result<usize, StoreError> {
        let cleared = self.store.clear_all_with(&onboarding::RECORD_KEYS)?;
        info!(cleared, "onboarding reset");
        Ok(cleared)
    }
}

impl DynStepStateManager {
    /// Assemble a manager from configuration.
    ///
    /// Opens the configured snapshot file (or memory storage), loads the
    /// configured TOML catalog (or the built-in one), and activates the
    /// previously selected country if there is one, else the default.
    pub fn from_config(config: &Config) -> Result<Self, SetupError> {
        let backend: Box<dyn KeyValueStore> = match &config.storage.path {
            Some(path) => Box::new(FileStore::open(path, config.storage.format)?),
            None => Box::new(MemoryStore::new()),
        };

        let catalog: Box<dyn StepCatalog> = match &config.catalog_path {
            Some(path) => Box::new(TomlCatalog::load(path)?),
            None => Box::new(BuiltinCatalog::new()),
        };

        let country = onboarding::selected_country(&backend)
            .map(|country| country.code)
            .unwrap_or_else(|| config.default_country.clone());

        info!(country = %country, template_version = config.template_version, "step state ready");
        Ok(Self::new(backend, catalog, &country, config.template_version))
    }

    /// Load a TOML config file and assemble a manager from it.
    pub fn from_config_file(path: impl AsRef<std::path::Path>) -> Result<Self, SetupError> {
        let config = Config::load(path)?;
        Self::from_config(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SnapshotFormat;
    use chrono::NaiveDate;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn manager() -> StepStateManager<MemoryStore, BuiltinCatalog> {
        let catalog = BuiltinCatalog::anchored(NaiveDate::from_ymd_opt(2025, 10, 23).unwrap());
        StepStateManager::new(MemoryStore::new(), catalog, "IT", 1)
    }

    #[test]
    fn italy_walkthrough() {
        let mut manager = manager();

        assert!(manager.can_toggle_step("codice-fiscale"));
        assert!(!manager.can_toggle_step("permesso-soggiorno"));
        assert!(!manager.can_toggle_step("tessera-sanitaria"));
        assert!(manager.is_step_active("codice-fiscale"));

        manager.toggle("codice-fiscale").unwrap();

        assert!(manager.is_done("codice-fiscale"));
        assert!(manager.can_toggle_step("permesso-soggiorno"));
        assert!(manager.is_step_active("permesso-soggiorno"));
        assert!(!manager.is_step_active("codice-fiscale"));
        assert_eq!(
            manager.active_step().map(|s| s.id),
            Some("permesso-soggiorno".to_string())
        );
    }

    #[test]
    fn try_toggle_refuses_locked_step() {
        let mut manager = manager();

        match manager.try_toggle("tessera-sanitaria") {
            Err(ToggleError::PreviousStepIncomplete { step_id, previous }) => {
                assert_eq!(step_id, "tessera-sanitaria");
                assert_eq!(previous, "permesso-soggiorno");
            }
            other => panic!("Expected PreviousStepIncomplete, got {other:?}"),
        }
        assert!(!manager.is_done("tessera-sanitaria"));
    }

    #[test]
    fn try_toggle_allows_unlocked_and_undo() {
        let mut manager = manager();
        assert!(manager.try_toggle("codice-fiscale").unwrap());
        assert!(manager.try_toggle("permesso-soggiorno").unwrap());
        assert!(!manager.try_toggle("codice-fiscale").unwrap());
        assert!(manager.is_done("permesso-soggiorno"));
    }

    #[test]
    fn try_toggle_rejects_unknown_step() {
        let mut manager = manager();
        let result = manager.try_toggle("curp-registration");
        assert!(matches!(result, Err(ToggleError::UnknownStep { country, .. }) if country == "IT"));
    }

    #[test]
    fn plain_toggle_is_permissive() {
        let mut manager = manager();
        assert!(manager.toggle("not-in-catalog").unwrap());
        assert!(manager.is_done("not-in-catalog"));
        assert!(!manager.can_toggle_step("not-in-catalog"));
    }

    #[test]
    fn update_country_switches_checklist_and_keeps_records() {
        let mut manager = manager();
        manager.set_done("codice-fiscale", true).unwrap();

        assert!(manager.update_country("MX", 1));
        assert_eq!(manager.current_country(), "MX");
        assert_eq!(manager.steps()[0].id, "curp-registration");
        assert!(!manager.is_done("codice-fiscale"));

        assert!(!manager.update_country("MX", 1));

        manager.update_country("IT", 1);
        assert!(manager.is_done("codice-fiscale"));
    }

    #[test]
    fn statuses_and_progress_follow_completion() {
        let mut manager = manager();
        manager.set_done("codice-fiscale", true).unwrap();

        let statuses = manager.statuses();
        assert_eq!(statuses.len(), 3);
        assert!(statuses[0].done && statuses[0].can_toggle && !statuses[0].is_active);
        assert!(!statuses[1].done && statuses[1].is_active);
        assert!(!statuses[2].can_toggle);

        assert_eq!(manager.progress(), Progress { done: 1, total: 3 });
    }

    #[test]
    fn home_window_shows_whole_short_checklist() {
        let mut manager = manager();
        manager.set_done("codice-fiscale", true).unwrap();
        let ids: Vec<String> = manager
            .visible_steps_for_home()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, ["codice-fiscale", "permesso-soggiorno", "tessera-sanitaria"]);
    }

    #[test]
    fn reset_current_country_clears_its_steps_only() {
        let mut manager = manager();
        manager.set_done("codice-fiscale", true).unwrap();
        manager.update_country("MX", 1);
        manager.set_done("curp-registration", true).unwrap();
        manager.update_country("IT", 1);

        manager.reset_current_country().unwrap();
        assert_eq!(manager.progress().done, 0);

        manager.update_country("MX", 1);
        assert!(manager.is_done("curp-registration"));
    }

    #[test]
    fn select_country_completes_onboarding_and_activates_checklist() {
        let mut manager = manager();
        let country = manager.select_country("MX").unwrap();

        assert_eq!(country.code, "MX");
        assert_eq!(manager.current_country(), "MX");
        assert!(manager.has_completed_onboarding());
        assert_eq!(manager.selected_country().unwrap().code, "MX");
    }

    #[test]
    fn select_unknown_country_keeps_current_checklist() {
        let mut manager = manager();
        assert!(manager.select_country("FR").is_err());
        assert_eq!(manager.current_country(), "IT");
        assert!(!manager.has_completed_onboarding());
    }

    #[test]
    fn reset_onboarding_clears_every_namespace() {
        let mut manager = manager();
        manager.select_country("IT").unwrap();
        manager.set_done("codice-fiscale", true).unwrap();
        manager.update_country("MX", 1);
        manager.set_done("curp-registration", true).unwrap();

        assert_eq!(manager.reset_onboarding().unwrap(), 2);

        assert!(!manager.has_completed_onboarding());
        assert!(manager.store().backend().is_empty());
    }

    #[test]
    fn observers_see_manager_mutations() {
        let mut manager = manager();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let id = manager.subscribe(move |event| sink.lock().unwrap().push(event.kind.clone()));

        manager.toggle("codice-fiscale").unwrap();
        manager.update_country("MX", 1);
        manager.update_country("MX", 1);
        assert!(manager.unsubscribe(id));
        manager.toggle("curp-registration").unwrap();

        assert_eq!(events.lock().unwrap().len(), 2);
    }

    #[test]
    fn from_config_defaults_to_memory_and_builtin() {
        let manager = DynStepStateManager::from_config(&Config::default()).unwrap();
        assert_eq!(manager.current_country(), "IT");
        assert_eq!(manager.steps().len(), 3);
    }

    #[test]
    fn unknown_step_queries_are_false() {
        let mut manager = manager();
        manager.set_done("codice-fiscale", true).unwrap();

        assert!(!manager.can_toggle_step("curp-registration"));
        assert!(!manager.is_step_active("curp-registration"));
        assert!(!manager.can_toggle_step(""));
    }

    #[test]
    fn failed_onboarding_reset_changes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("sub");
        let backend = FileStore::open(dir.join("state.json"), SnapshotFormat::Json).unwrap();
        let catalog = BuiltinCatalog::anchored(NaiveDate::from_ymd_opt(2025, 10, 23).unwrap());
        let mut manager = StepStateManager::new(backend, catalog, "IT", 1);
        manager.select_country("IT").unwrap();
        manager.try_toggle("codice-fiscale").unwrap();

        fs::remove_dir_all(&dir).unwrap();
        fs::write(&dir, "not a directory").unwrap();

        assert!(manager.reset_onboarding().is_err());
        assert!(manager.has_completed_onboarding());
        assert!(manager.is_done("codice-fiscale"));
    }
}
