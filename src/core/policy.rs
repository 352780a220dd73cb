//! Sequential unlock policy for step checklists.
//!
//! Every function here is pure: given a catalog and a completion lookup it
//! derives which steps may be toggled, which step is active, and which
//! window of steps the condensed home view shows. Nothing is stored.
//!
//! Unlocking is strictly local: a step that is not done may be marked done
//! only when its immediate predecessor (by `order`) is done. The first step
//! and any step that is already done can always be toggled.

use super::lookup::CompletionLookup;
use super::step::StepDefinition;
use serde::{Deserialize, Serialize};

/// Maximum number of steps in the home view window.
pub const HOME_WINDOW_SIZE: usize = 3;

/// Sort steps ascending by `order`.
///
/// The sort is stable, so steps sharing an `order` keep their catalog
/// position.
///
/// # Example
///
/// ```rust
/// use stepgate::core::{sorted_steps, StepDefinition};
///
/// let steps = vec![
///     StepDefinition::new("ts", 30, "IT"),
///     StepDefinition::new("cf", 10, "IT"),
///     StepDefinition::new("ps", 20, "IT"),
/// ];
///
/// let ids: Vec<&str> = sorted_steps(&steps).iter().map(|s| s.id.as_str()).collect();
/// assert_eq!(ids, ["cf", "ps", "ts"]);
/// ```
pub fn sorted_steps(steps: &[StepDefinition]) -> Vec<&StepDefinition> {
    let mut sorted: Vec<&StepDefinition> = steps.iter().collect();
    sorted.sort_by_key(|step| step.order);
    sorted
}

/// Check whether a step may be toggled right now.
///
/// Returns `false` when `step_id` is not in the catalog.
///
/// # Example
///
/// ```rust
/// use stepgate::core::{can_toggle_step, StepDefinition};
///
/// let steps = vec![
///     StepDefinition::new("cf", 10, "IT"),
///     StepDefinition::new("ps", 20, "IT"),
/// ];
/// let nothing_done = |_: &str| false;
///
/// assert!(can_toggle_step(&steps, "cf", &nothing_done));
/// assert!(!can_toggle_step(&steps, "ps", &nothing_done));
/// assert!(!can_toggle_step(&steps, "missing", &nothing_done));
/// ```
pub fn can_toggle_step<L>(steps: &[StepDefinition], step_id: &str, lookup: &L) -> bool
where
    L: CompletionLookup + ?Sized,
{
    let sorted = sorted_steps(steps);
    match position(&sorted, step_id) {
        Some(index) => can_toggle_at(&sorted, index, lookup),
        None => false,
    }
}

/// Check whether a step is the current focus: not done, but toggleable.
pub fn is_step_active<L>(steps: &[StepDefinition], step_id: &str, lookup: &L) -> bool
where
    L: CompletionLookup + ?Sized,
{
    let sorted = sorted_steps(steps);
    match position(&sorted, step_id) {
        Some(index) => is_active_at(&sorted, index, lookup),
        None => false,
    }
}

/// Select the steps shown in the condensed home view.
///
/// The sorted checklist is split into groups of [`HOME_WINDOW_SIZE`]. While
/// the first incomplete step sits in the first group, the first group is
/// shown. Afterwards the group containing the first incomplete step is
/// shown, and once everything is done the last group is shown.
///
/// # Example
///
/// ```rust
/// use stepgate::core::{visible_steps_for_home, StepDefinition};
///
/// let steps: Vec<StepDefinition> = (0..6)
///     .map(|i| StepDefinition::new(format!("s{i}"), i * 10, "IT"))
///     .collect();
/// let first_three_done = |id: &str| matches!(id, "s0" | "s1" | "s2");
///
/// let ids: Vec<&str> = visible_steps_for_home(&steps, &first_three_done)
///     .iter()
///     .map(|s| s.id.as_str())
///     .collect();
/// assert_eq!(ids, ["s3", "s4", "s5"]);
/// ```
pub fn visible_steps_for_home<'a, L>(
    steps: &'a [StepDefinition],
    lookup: &L,
) -> Vec<&'a StepDefinition>
where
    L: CompletionLookup + ?Sized,
{
    let sorted = sorted_steps(steps);

    let first_incomplete = sorted
        .iter()
        .position(|step| !lookup.is_done(&step.id))
        .unwrap_or(sorted.len());

    if first_incomplete < HOME_WINDOW_SIZE {
        return sorted.into_iter().take(HOME_WINDOW_SIZE).collect();
    }

    // All done: anchor on the last step so the last group is shown
    let anchor = first_incomplete.min(sorted.len() - 1);
    let group_start = (anchor / HOME_WINDOW_SIZE) * HOME_WINDOW_SIZE;
    let group_end = (group_start + HOME_WINDOW_SIZE).min(sorted.len());
    sorted[group_start..group_end].to_vec()
}

fn position(sorted: &[&StepDefinition], step_id: &str) -> Option<usize> {
    sorted.iter().position(|step| step.id == step_id)
}

fn can_toggle_at<L>(sorted: &[&StepDefinition], index: usize, lookup: &L) -> bool
where
    L: CompletionLookup + ?Sized,
{
    if index == 0 {
        return true;
    }

    // Undo is always allowed
    if lookup.is_done(&sorted[index].id) {
        return true;
    }

    lookup.is_done(&sorted[index - 1].id)
}

fn is_active_at<L>(sorted: &[&StepDefinition], index: usize, lookup: &L) -> bool
where
    L: CompletionLookup + ?Sized,
{
    !lookup.is_done(&sorted[index].id) && can_toggle_at(sorted, index, lookup)
}

/// Derived view of one step under the current completion state.
#[derive(Clone, Debug, PartialEq)]
pub struct StepStatus<'a> {
    pub step: &'a StepDefinition,
    pub done: bool,
    pub can_toggle: bool,
    pub is_active: bool,
}

/// Completion totals for a checklist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl Progress {
    /// Share of steps done, `0.0` for an empty checklist.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.done as f64 / self.total as f64
        }
    }

    /// True when the checklist is non-empty and every step is done.
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.done == self.total
    }
}

/// Per-step flags derived from a catalog and a completion lookup.
///
/// This is a snapshot: it reflects the lookup at the moment it was derived
/// and does not update afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct SequencingState<'a> {
    statuses: Vec<StepStatus<'a>>,
}

impl<'a> SequencingState<'a> {
    /// Derive the status of every step, in sorted order.
    pub fn derive<L>(steps: &'a [StepDefinition], lookup: &L) -> Self
    where
        L: CompletionLookup + ?Sized,
    {
        let sorted = sorted_steps(steps);
        let statuses = (0..sorted.len())
            .map(|index| StepStatus {
                step: sorted[index],
                done: lookup.is_done(&sorted[index].id),
                can_toggle: can_toggle_at(&sorted, index, lookup),
                is_active: is_active_at(&sorted, index, lookup),
            })
            .collect();
        Self { statuses }
    }

    /// Statuses in sorted order.
    pub fn statuses(&self) -> &[StepStatus<'a>] {
        &self.statuses
    }

    /// Status of a step by id, if it is in the catalog.
    pub fn status(&self, step_id: &str) -> Option<&StepStatus<'a>> {
        self.statuses.iter().find(|status| status.step.id == step_id)
    }

    /// The first active step in order, if any.
    ///
    /// Usually there is exactly one. After an earlier step is unchecked
    /// behind a later done step, several steps can be active at once.
    pub fn active_step(&self) -> Option<&'a StepDefinition> {
        self.statuses
            .iter()
            .find(|status| status.is_active)
            .map(|status| status.step)
    }

    pub fn progress(&self) -> Progress {
        Progress {
            done: self.statuses.iter().filter(|status| status.done).count(),
            total: self.statuses.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn italy() -> Vec<StepDefinition> {
        vec![
            StepDefinition::new("cf", 10, "IT"),
            StepDefinition::new("ps", 20, "IT"),
            StepDefinition::new("ts", 30, "IT"),
        ]
    }

    fn six_steps() -> Vec<StepDefinition> {
        (0..6)
            .map(|i| StepDefinition::new(format!("s{i}"), (i as i32) * 10, "IT"))
            .collect()
    }

    fn ids<'a>(steps: &[&'a StepDefinition]) -> Vec<&'a str> {
        steps.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn sort_is_stable_for_equal_orders() {
        let steps = vec![
            StepDefinition::new("b", 20, "IT"),
            StepDefinition::new("x", 10, "IT"),
            StepDefinition::new("y", 10, "IT"),
            StepDefinition::new("a", 5, "IT"),
        ];
        assert_eq!(ids(&sorted_steps(&steps)), ["a", "x", "y", "b"]);
    }

    #[test]
    fn first_step_is_always_toggleable() {
        let steps = italy();
        assert!(can_toggle_step(&steps, "cf", &|_: &str| false));
        assert!(can_toggle_step(&steps, "cf", &|_: &str| true));
        assert!(can_toggle_step(&steps, "cf", &|id: &str| id == "ts"));
    }

    #[test]
    fn first_step_is_found_in_unsorted_catalog() {
        let mut steps = italy();
        steps.reverse();
        assert!(can_toggle_step(&steps, "cf", &|_: &str| false));
        assert!(!can_toggle_step(&steps, "ts", &|_: &str| false));
    }

    #[test]
    fn later_steps_are_gated_on_predecessor() {
        let steps = italy();
        let nothing = |_: &str| false;
        assert!(!can_toggle_step(&steps, "ps", &nothing));
        assert!(!can_toggle_step(&steps, "ts", &nothing));

        let cf_done = |id: &str| id == "cf";
        assert!(can_toggle_step(&steps, "ps", &cf_done));
        assert!(!can_toggle_step(&steps, "ts", &cf_done));
    }

    #[test]
    fn done_step_can_always_be_unchecked() {
        let steps = italy();
        let only_ps = |id: &str| id == "ps";
        assert!(can_toggle_step(&steps, "ps", &only_ps));
    }

    #[test]
    fn unknown_step_cannot_be_toggled_or_active() {
        let steps = italy();
        assert!(!can_toggle_step(&steps, "nope", &|_: &str| true));
        assert!(!is_step_active(&steps, "nope", &|_: &str| false));
    }

    #[test]
    fn empty_catalog_yields_empty_results() {
        let steps: Vec<StepDefinition> = Vec::new();
        assert!(!can_toggle_step(&steps, "cf", &|_: &str| false));
        assert!(visible_steps_for_home(&steps, &|_: &str| false).is_empty());
        let state = SequencingState::derive(&steps, &|_: &str| false);
        assert!(state.statuses().is_empty());
        assert!(state.active_step().is_none());
        assert_eq!(state.progress(), Progress { done: 0, total: 0 });
    }

    #[test]
    fn active_step_moves_forward_as_steps_complete() {
        let steps = italy();
        let nothing = |_: &str| false;
        assert!(is_step_active(&steps, "cf", &nothing));
        assert!(!is_step_active(&steps, "ps", &nothing));

        let cf_done = |id: &str| id == "cf";
        assert!(!is_step_active(&steps, "cf", &cf_done));
        assert!(is_step_active(&steps, "ps", &cf_done));
        assert!(!is_step_active(&steps, "ts", &cf_done));
    }

    #[test]
    fn unchecking_earlier_step_keeps_later_step_done() {
        // cf was unchecked after ps was completed
        let steps = italy();
        let ps_only = |id: &str| id == "ps";
        let state = SequencingState::derive(&steps, &ps_only);

        let cf = state.status("cf").unwrap();
        assert!(cf.is_active);
        let ps = state.status("ps").unwrap();
        assert!(ps.done && ps.can_toggle && !ps.is_active);
        let ts = state.status("ts").unwrap();
        assert!(ts.can_toggle && ts.is_active);
        assert_eq!(state.active_step().map(|s| s.id.as_str()), Some("cf"));
    }

    #[test]
    fn window_shows_first_group_while_early() {
        let steps = six_steps();
        for done_prefix in 0..3 {
            let done: HashSet<String> = (0..done_prefix).map(|i| format!("s{i}")).collect();
            let lookup = |id: &str| done.contains(id);
            let visible = visible_steps_for_home(&steps, &lookup);
            assert_eq!(ids(&visible), ["s0", "s1", "s2"]);
        }
    }

    #[test]
    fn window_stays_on_first_group_when_early_step_incomplete() {
        let steps = six_steps();
        let lookup = |id: &str| matches!(id, "s0" | "s2" | "s3" | "s4");
        let visible = visible_steps_for_home(&steps, &lookup);
        assert_eq!(ids(&visible), ["s0", "s1", "s2"]);
    }

    #[test]
    fn window_moves_to_group_of_first_incomplete() {
        let steps = six_steps();
        let lookup = |id: &str| matches!(id, "s0" | "s1" | "s2");
        let visible = visible_steps_for_home(&steps, &lookup);
        assert_eq!(ids(&visible), ["s3", "s4", "s5"]);
    }

    #[test]
    fn window_shows_last_group_when_all_done() {
        let steps = six_steps();
        let visible = visible_steps_for_home(&steps, &|_: &str| true);
        assert_eq!(ids(&visible), ["s3", "s4", "s5"]);
    }

    #[test]
    fn window_with_exactly_three_steps_all_done_is_everything() {
        let steps = italy();
        let visible = visible_steps_for_home(&steps, &|_: &str| true);
        assert_eq!(ids(&visible), ["cf", "ps", "ts"]);
    }

    #[test]
    fn window_truncates_partial_last_group() {
        let steps: Vec<StepDefinition> = (0..7)
            .map(|i| StepDefinition::new(format!("s{i}"), i * 10, "IT"))
            .collect();
        let visible = visible_steps_for_home(&steps, &|_: &str| true);
        assert_eq!(ids(&visible), ["s6"]);

        let first_six = |id: &str| id != "s6";
        let visible = visible_steps_for_home(&steps, &first_six);
        assert_eq!(ids(&visible), ["s6"]);
    }

    #[test]
    fn window_with_fewer_than_three_steps_is_everything() {
        let steps = vec![
            StepDefinition::new("b", 2, "IT"),
            StepDefinition::new("a", 1, "IT"),
        ];
        assert_eq!(ids(&visible_steps_for_home(&steps, &|_: &str| false)), ["a", "b"]);
        assert_eq!(ids(&visible_steps_for_home(&steps, &|_: &str| true)), ["a", "b"]);
    }

    #[test]
    fn sequencing_state_matches_individual_queries() {
        let steps = italy();
        let cf_done = |id: &str| id == "cf";
        let state = SequencingState::derive(&steps, &cf_done);

        for status in state.statuses() {
            assert_eq!(status.done, cf_done(status.step.id.as_str()));
            assert_eq!(status.can_toggle, can_toggle_step(&steps, &status.step.id, &cf_done));
            assert_eq!(status.is_active, is_step_active(&steps, &status.step.id, &cf_done));
        }
        assert_eq!(state.progress(), Progress { done: 1, total: 3 });
    }

    #[test]
    fn progress_fraction_and_completion() {
        let empty = Progress { done: 0, total: 0 };
        assert_eq!(empty.fraction(), 0.0);
        assert!(!empty.is_complete());

        let partial = Progress { done: 1, total: 4 };
        assert_eq!(partial.fraction(), 0.25);
        assert!(!partial.is_complete());

        let full = Progress { done: 3, total: 3 };
        assert!(full.is_complete());
    }
}
