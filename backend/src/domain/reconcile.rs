//! Pure reconciliation of persisted recipe collections against desired state.
//!
//! Both reconcilers consume a fresh read of the current rows and the caller's
//! submission and return the write sets needed to move from one to the other.
//! Neither validates the submission: a repeated id or step number lands in the
//! add set and is rejected by the storage uniqueness constraint, which rolls
//! back the surrounding transaction.

use std::collections::{BTreeMap, BTreeSet};

use super::Instruction;

/// Add/remove sets for a link collection keyed by catalog id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDiff<T> {
    /// Ids to link, in ascending order. Repeated submissions are kept.
    pub to_add: Vec<T>,
    /// Ids to unlink, in ascending order.
    pub to_remove: Vec<T>,
}

impl<T> LinkDiff<T> {
    /// Whether applying the diff would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Diff the `current` linked ids against the `desired` ones.
///
/// Ids present on both sides are left alone. Both output sets are sorted
/// so the same inputs always produce the same write sequence.
///
/// # Examples
/// ```
/// use mealbook::domain::reconcile_links;
///
/// let diff = reconcile_links(&[1, 2, 3], &[5, 3, 4]);
/// assert_eq!(diff.to_add, vec![4, 5]);
/// assert_eq!(diff.to_remove, vec![1, 2]);
/// ```
#[must_use]
pub fn reconcile_links<T>(current: &[T], desired: &[T]) -> LinkDiff<T>
where
    T: Ord + Copy,
{
    let mut remaining: BTreeSet<T> = current.iter().copied().collect();
    let mut to_add = Vec::new();
    for id in desired {
        if !remaining.remove(id) {
            to_add.push(*id);
        }
    }
    to_add.sort_unstable();
    LinkDiff {
        to_add,
        to_remove: remaining.into_iter().collect(),
    }
}

/// Add/update/delete sets for a recipe's instructions keyed by step number.
///
/// Apply in field order: adds, then updates, then deletes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InstructionPlan {
    /// Submitted steps with no persisted counterpart.
    pub to_add: Vec<Instruction>,
    /// Submitted steps replacing the persisted text of the same step number.
    pub to_update: Vec<Instruction>,
    /// Persisted step numbers absent from the submission, ascending.
    pub to_delete: Vec<i32>,
}

/// Plan the writes that turn `current` instructions into `desired` ones.
///
/// # Examples
/// ```
/// use mealbook::domain::{Instruction, reconcile_instructions};
///
/// let step = |n: i32| Instruction { step_no: n, instruction: format!("step {n}") };
/// let plan = reconcile_instructions(&[step(1), step(2)], &[step(2), step(3)]);
/// assert_eq!(plan.to_add, vec![step(3)]);
/// assert_eq!(plan.to_update, vec![step(2)]);
/// assert_eq!(plan.to_delete, vec![1]);
/// ```
#[must_use]
pub fn reconcile_instructions(current: &[Instruction], desired: &[Instruction]) -> InstructionPlan {
    let mut remaining: BTreeMap<i32, &Instruction> =
        current.iter().map(|row| (row.step_no, row)).collect();
    let mut plan = InstructionPlan::default();
    for submitted in desired {
        if remaining.remove(&submitted.step_no).is_some() {
            plan.to_update.push(submitted.clone());
        } else {
            plan.to_add.push(submitted.clone());
        }
    }
    plan.to_delete = remaining.into_keys().collect();
    plan
}
