use std::fmt::Debug;

use crate::assignment::RankAssignment;
use crate::config::{ControlPolicy, Item, SelectionErrors, Transition};

/// How the engine settles selections and rank conflicts.
///
/// The engine hands the policy the list and the assignment derived from it. The
/// policy mutates the ranks in place and the engine re-derives the assignment
/// afterwards, checking the rank invariants.
pub trait SelectionPolicy: Debug {
    fn name(&self) -> &'static str;

    /// Gives a rank to the unranked item at `position`.
    fn assign(
        &self,
        items: &mut [Item],
        position: usize,
        assignment: &RankAssignment,
    ) -> Transition;

    /// Clears the rank of the ranked item at `position`.
    fn release(
        &self,
        items: &mut [Item],
        position: usize,
        assignment: &RankAssignment,
    ) -> Transition;

    /// Exchanges the rank values of two ranked items, without moving them.
    fn exchange_ranks(&self, items: &mut [Item], position: usize, other: usize) -> Transition;
}

/// The engine decides for the voter: conflicting ranks are swapped, and a
/// deselected item gives up its rank without shifting anybody else.
// Deselection does not shift the lower preferences up by one, although the written
// description of this policy says it should. Unresolved.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct Adjudicated;

impl SelectionPolicy for Adjudicated {
    fn name(&self) -> &'static str {
        "adjudicated"
    }

    fn assign(
        &self,
        items: &mut [Item],
        position: usize,
        assignment: &RankAssignment,
    ) -> Transition {
        if assignment.contract_met() {
            return Transition::Ignored;
        }
        items[position].rank = Some(assignment.current_rank());
        Transition::Applied
    }

    fn release(
        &self,
        items: &mut [Item],
        position: usize,
        _assignment: &RankAssignment,
    ) -> Transition {
        items[position].rank = None;
        Transition::Applied
    }

    fn exchange_ranks(&self, items: &mut [Item], position: usize, other: usize) -> Transition {
        let rank = items[position].rank;
        items[position].rank = items[other].rank;
        items[other].rank = rank;
        Transition::Applied
    }
}

impl ControlPolicy {
    /// The built-in strategy implementing this policy.
    pub fn strategy(&self) -> Result<Box<dyn SelectionPolicy>, SelectionErrors> {
        match self {
            ControlPolicy::Adjudicated => Ok(Box::new(Adjudicated)),
            // TODO: needs a decision on whether raising onto a taken rank unranks the
            // holder or is refused.
            ControlPolicy::Uncontrolled => Err(SelectionErrors::UnsupportedPolicy(*self)),
        }
    }
}
