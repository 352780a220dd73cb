//! Stepgate: sequential onboarding checklists with persisted progress
//!
//! Stepgate follows a "pure core, imperative shell" layout. The core decides
//! which checklist steps are unlocked from a catalog and a completion
//! lookup, with no side effects. The store persists one boolean per step,
//! namespaced by template version and country, and notifies observers on
//! every change.
//!
//! # Core Concepts
//!
//! - **Steps**: Immutable catalog entries ordered by `order`
//! - **Sequencing**: A step unlocks once its immediate predecessor is done
//! - **Check Store**: Namespaced completion flags over a key-value backend
//! - **Manager**: The facade a UI holds for the active country's checklist
//!
//! # Example
//!
//! ```rust
//! use stepgate::catalog::BuiltinCatalog;
//! use stepgate::store::MemoryStore;
//! use stepgate::StepStateManager;
//!
//! let mut manager = StepStateManager::new(MemoryStore::new(), BuiltinCatalog::new(), "IT", 1);
//!
//! // Only the first step is open at the start
//! assert!(manager.is_step_active("codice-fiscale"));
//! assert!(manager.try_toggle("tessera-sanitaria").is_err());
//!
//! manager.try_toggle("codice-fiscale").unwrap();
//! assert!(manager.is_step_active("permesso-soggiorno"));
//! assert_eq!(manager.progress().done, 1);
//! ```

pub mod catalog;
pub mod config;
pub mod core;
pub mod manager;
pub mod onboarding;
pub mod store;

// Re-export commonly used types
pub use crate::config::Config;
pub use crate::core::{CompletionLookup, Namespace, StepDefinition};
pub use crate::manager::{DynStepStateManager, StepStateManager, StepView, ToggleError};
pub use crate::store::{CheckStateStore, StoreError};
