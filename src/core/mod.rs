//! Core checklist types and sequencing logic.
//!
//! This module contains the pure part of the crate:
//! - Step definitions and completion-record namespaces
//! - The `CompletionLookup` seam the policy reads through
//! - The sequential unlock policy and home-view windowing
//! - Change events emitted by the store
//!
//! Nothing in this module performs I/O.

mod event;
mod lookup;
mod namespace;
mod policy;
mod step;

pub use event::{ChangeEvent, ChangeKind};
pub use lookup::CompletionLookup;
pub use namespace::{Namespace, CHECKSTATE_PREFIX, DEFAULT_TEMPLATE_VERSION};
pub use policy::{
    can_toggle_step, is_step_active, sorted_steps, visible_steps_for_home, Progress,
    SequencingState, StepStatus, HOME_WINDOW_SIZE,
};
pub use step::{StepDefinition, StepId};
