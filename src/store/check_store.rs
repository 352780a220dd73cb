//! Persistent per-namespace completion flags.

use super::backend::KeyValueStore;
use super::error::StoreError;
use super::observer::{Observers, SubscriptionId};
use crate::core::{ChangeEvent, ChangeKind, CompletionLookup, Namespace, CHECKSTATE_PREFIX};
use tracing::debug;

/// Stores a boolean "done" flag per step, scoped to the active namespace.
///
/// Absent records read as not done. Every mutation notifies the registered
/// observers synchronously before returning.
///
/// # Example
///
/// ```rust
/// use stepgate::core::Namespace;
/// use stepgate::store::{CheckStateStore, MemoryStore};
///
/// let mut store = CheckStateStore::new(MemoryStore::new(), Namespace::for_country("IT"));
/// assert!(!store.is_done("codice-fiscale"));
///
/// store.toggle("codice-fiscale").unwrap();
/// assert!(store.is_done("codice-fiscale"));
///
/// store.switch_namespace("MX", 1);
/// assert!(!store.is_done("codice-fiscale"));
/// ```
#[derive(Debug)]
pub struct CheckStateStore<B: KeyValueStore> {
    backend: B,
    namespace: Namespace,
    observers: Observers,
}

impl<B: KeyValueStore> CheckStateStore<B> {
    pub fn new(backend: B, namespace: Namespace) -> Self {
        Self {
            backend,
            namespace,
            observers: Observers::new(),
        }
    }

    /// The namespace addressed by reads and writes.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Persisted flag for `step_id`, `None` if never set or reset.
    pub fn record(&self, step_id: &str) -> Option<bool> {
        self.backend.get_bool(&self.namespace.key_for(step_id))
    }

    pub fn is_done(&self, step_id: &str) -> bool {
        self.record(step_id).unwrap_or(false)
    }

    /// Write the flag for `step_id` in the active namespace.
    ///
    /// Observers are notified even when the value is unchanged.
    pub fn set_done(&mut self, step_id: &str, done: bool) -> Result<(), StoreError> {
        let key = self.namespace.key_for(step_id);
        self.backend.set_bool(&key, done)?;
        debug!(namespace = %self.namespace, step_id, done, "step flag written");

        self.emit(ChangeKind::StepSet {
            step_id: step_id.to_string(),
            done,
        });
        Ok(())
    }

    /// Flip the flag for `step_id`, returning the new value.
    pub fn toggle(&mut self, step_id: &str) -> Result<bool, StoreError> {
        let done = !self.is_done(step_id);
        self.set_done(step_id, done)?;
        Ok(done)
    }

    /// Address a different namespace.
    ///
    /// Records are neither read nor migrated. Switching to the namespace
    /// already active does nothing and returns `false`.
    pub fn switch_namespace(&mut self, country_code: &str, template_version: u32) -> bool {
        let next = Namespace::new(country_code, template_version);
        if next == self.namespace {
            return false;
        }

        let previous = std::mem::replace(&mut self.namespace, next);
        debug!(from = %previous, to = %self.namespace, "namespace switched");

        self.emit(ChangeKind::NamespaceSwitched { previous });
        true
    }

    /// Remove the records of `step_ids` in the active namespace.
    pub fn reset<I, S>(&mut self, step_ids: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let step_ids: Vec<String> = step_ids
            .into_iter()
            .map(|id| id.as_ref().to_string())
            .collect();
        let keys: Vec<String> = step_ids
            .iter()
            .map(|id| self.namespace.key_for(id))
            .collect();

        self.backend.remove_keys(&keys)?;
        debug!(namespace = %self.namespace, count = keys.len(), "step flags reset");

        self.emit(ChangeKind::Reset { step_ids });
        Ok(())
    }

    /// Remove every completion record in every namespace.
    ///
    /// Returns how many records were removed.
    pub fn clear_all(&mut self) -> Result<usize, StoreError> {
        self.clear_all_with(&[])
    }

    /// [`clear_all`](Self::clear_all), also removing `extra_keys` in the
    /// same backend write.
    pub(crate) fn clear_all_with(&mut self, extra_keys: &[&str]) -> Result<usize, StoreError> {
        let mut keys: Vec<String> = self
            .backend
            .keys()
            .into_iter()
            .filter(|key| key.starts_with(CHECKSTATE_PREFIX))
            .collect();
        let cleared = keys.len();
        keys.extend(extra_keys.iter().map(|key| key.to_string()));

        self.backend.remove_keys(&keys)?;
        debug!(count = cleared, "all step flags cleared");

        self.emit(ChangeKind::Cleared);
        Ok(cleared)
    }

    /// Register an observer for every subsequent mutation.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub(crate) fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn emit(&self, kind: ChangeKind) {
        let event = ChangeEvent::new(self.namespace.clone(), kind);
        self.observers.notify(&event);
    }
}

impl<B: KeyValueStore> CompletionLookup for CheckStateStore<B> {
    fn is_done(&self, step_id: &str) -> bool {
        CheckStateStore::is_done(self, step_id)
    }
}
