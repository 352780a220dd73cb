//! Completion lookup used by the sequencing policy.
//!
//! The policy never reads storage directly. It asks a `CompletionLookup`
//! whether a step is done, which keeps every policy function pure.

/// Read-only view of step completion.
///
/// Implemented for any `Fn(&str) -> bool`, and by the persistent
/// [`CheckStateStore`](crate::store::CheckStateStore) for its active
/// namespace.
///
/// # Example
///
/// ```rust
/// use stepgate::core::CompletionLookup;
///
/// let done = |id: &str| id == "codice-fiscale";
///
/// assert!(done.is_done("codice-fiscale"));
/// assert!(!done.is_done("permesso-soggiorno"));
/// ```
pub trait CompletionLookup {
    /// Whether the step is done. Unknown ids are not done.
    fn is_done(&self, step_id: &str) -> bool;
}

impl<F> CompletionLookup for F
where
    F: Fn(&str) -> bool,
{
    fn is_done(&self, step_id: &str) -> bool {
        self(step_id)
    }
}
