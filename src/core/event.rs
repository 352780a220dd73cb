//! Change notifications emitted by the check store.

use super::namespace::Namespace;
use super::step::StepId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// A step's flag was written, even if the value did not change
    StepSet { step_id: StepId, done: bool },

    /// Records for these ids were removed from the namespace
    Reset { step_ids: Vec<StepId> },

    /// The store now addresses a different namespace
    NamespaceSwitched { previous: Namespace },

    /// Every completion record in every namespace was removed
    Cleared,
}

/// A single change to completion state.
///
/// `namespace` is the namespace active after the change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub namespace: Namespace,
    pub kind: ChangeKind,
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(namespace: Namespace, kind: ChangeKind) -> Self {
        Self {
            namespace,
            kind,
            timestamp: Utc::now(),
        }
    }

    /// Whether the change touched the given step.
    pub fn affects(&self, step_id: &str) -> bool {
        match &self.kind {
            ChangeKind::StepSet { step_id: id, .. } => id == step_id,
            ChangeKind::Reset { step_ids } => step_ids.iter().any(|id| id == step_id),
            ChangeKind::NamespaceSwitched { .. } | ChangeKind::Cleared => true,
        }
    }
}
