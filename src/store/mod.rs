//! Persistent check store and its storage backends.
//!
//! This is the imperative shell around the pure core: it owns every
//! persisted completion flag and is the only component that writes
//! `checkstate_` keys.
//!
//! # Key Concepts
//!
//! - **Backends**: `KeyValueStore` implementations, in memory or on disk
//! - **Snapshots**: Versioned JSON or binary image of a file-backed store
//! - **Check Store**: Namespaced completion flags with change notification
//!
//! # Example
//!
//! ```rust
//! use stepgate::core::Namespace;
//! use stepgate::store::{CheckStateStore, MemoryStore};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let mut store = CheckStateStore::new(MemoryStore::new(), Namespace::for_country("IT"));
//!
//! let changes = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&changes);
//! store.subscribe(move |_| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! store.set_done("codice-fiscale", true).unwrap();
//! store.reset(["codice-fiscale"]).unwrap();
//!
//! assert!(!store.is_done("codice-fiscale"));
//! assert_eq!(changes.load(Ordering::SeqCst), 2);
//! ```

mod backend;
mod check_store;
pub mod error;
mod observer;
mod snapshot;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use check_store::CheckStateStore;
pub use error::StoreError;
pub use observer::{Observers, SubscriptionId};
pub use snapshot::{Snapshot, SnapshotFormat, StoredValue, SNAPSHOT_VERSION};
