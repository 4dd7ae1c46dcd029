mod assignment;
pub mod builder;
mod config;
pub mod flags;
pub mod manual;
mod policy;
pub mod reorder;

use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info};

pub use crate::assignment::RankAssignment;
pub use crate::config::*;
pub use crate::flags::{FlagCache, ItemFlags};
pub use crate::policy::{Adjudicated, SelectionPolicy};
pub use crate::reorder::ReorderCoordinator;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(0);

/// The state of one ranked ballot: the ordered list of items and their ranks.
///
/// The list position of an item and its rank are independent. Two families of
/// operations reorder the ballot:
/// * `move_up` / `move_down` move items in the list. The ranks stay with the list
///   positions, so the moved items trade ranks as well as places.
/// * `raise_rank` / `lower_rank` exchange rank values. The list does not move until
///   `sort` is called.
///
/// Requests that make no sense in the current state (ballot full, nothing above to
/// swap with, ...) are ignored. Errors are only returned when the caller passes a
/// position, an id or a rank that does not match the ballot.
///
/// ```
/// use ranked_selection::builder::Builder;
/// use ranked_selection::{ContestRules, SelectionErrors};
///
/// let mut engine = Builder::new(&ContestRules::with_max_rank(2))?
///     .candidates(&["Anna".to_string(), "Bob".to_string(), "Clara".to_string()])?
///     .build()?;
///
/// engine.select(2)?;
/// engine.select(0)?;
/// engine.sort();
/// assert_eq!(engine.items()[0].name, "Clara");
/// assert!(engine.contract_met());
///
/// # Ok::<(), SelectionErrors>(())
/// ```
#[derive(Debug)]
pub struct SelectionEngine {
    items: Vec<Item>,
    max_rank: Rank,
    policy: Box<dyn SelectionPolicy>,
    assignment: RankAssignment,
    // Distinguishes engines whose versions would otherwise collide.
    instance: u64,
    // Incremented every time the ballot changes.
    version: u64,
}

impl SelectionEngine {
    /// Creates an engine with the built-in strategy for the rules' control policy.
    pub fn new(items: Vec<Item>, rules: &ContestRules) -> Result<SelectionEngine, SelectionErrors> {
        let policy = rules.control_policy.strategy()?;
        SelectionEngine::with_policy(items, rules.max_rank, policy)
    }

    /// Creates an engine with a custom strategy.
    ///
    /// The items may already carry ranks, as long as they are distinct and within
    /// [0, max_rank).
    pub fn with_policy(
        items: Vec<Item>,
        max_rank: Rank,
        policy: Box<dyn SelectionPolicy>,
    ) -> Result<SelectionEngine, SelectionErrors> {
        RankAssignment::validate(&items, max_rank)?;
        let assignment = RankAssignment::from_items(&items, max_rank);
        info!(
            "SelectionEngine: {} items, max rank {}, policy {}, {} already ranked",
            items.len(),
            max_rank,
            policy.name(),
            assignment.num_ranked()
        );
        Ok(SelectionEngine {
            items,
            max_rank,
            policy,
            assignment,
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            version: 0,
        })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, position: usize) -> Result<&Item, SelectionErrors> {
        self.check_position(position)?;
        Ok(&self.items[position])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The current list position of the item with this id.
    pub fn position_of(&self, id: &str) -> Result<usize, SelectionErrors> {
        self.items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| SelectionErrors::UnknownItem(id.to_string()))
    }

    /// The ranks of the items, in list order.
    pub fn ranks(&self) -> Vec<Option<Rank>> {
        self.items.iter().map(|i| i.rank).collect()
    }

    pub fn max_rank(&self) -> Rank {
        self.max_rank
    }

    pub fn assignment(&self) -> &RankAssignment {
        &self.assignment
    }

    pub fn current_rank(&self) -> Rank {
        self.assignment.current_rank()
    }

    pub fn contract_met(&self) -> bool {
        self.assignment.contract_met()
    }

    pub fn is_sorted(&self) -> bool {
        self.assignment.is_sorted()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// A number unique to this engine within the process.
    pub fn instance(&self) -> u64 {
        self.instance
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// The flags of the item at `position` for the given control mode.
    pub fn flags(&self, position: usize, mode: MoveMode) -> Result<ItemFlags, SelectionErrors> {
        self.check_position(position)?;
        Ok(flags::item_flags(
            &self.items,
            &self.assignment,
            position,
            mode,
        ))
    }

    /// Selects or deselects the item at `position`.
    ///
    /// An unranked item receives the current rank, unless all the ranks are taken.
    /// A ranked item loses its rank; the other ranks do not change.
    pub fn select(&mut self, position: usize) -> Result<Transition, SelectionErrors> {
        self.check_position(position)?;
        let transition = if self.items[position].is_ranked() {
            self.policy
                .release(&mut self.items, position, &self.assignment)
        } else {
            self.policy
                .assign(&mut self.items, position, &self.assignment)
        };
        Ok(self.finish("select", position, transition))
    }

    pub fn select_id(&mut self, id: &str) -> Result<Transition, SelectionErrors> {
        let position = self.position_of(id)?;
        self.select(position)
    }

    /// Puts the ranked items first, by ascending rank. The unranked items follow in
    /// their current relative order.
    pub fn sort(&mut self) -> Transition {
        let before: Vec<String> = self.items.iter().map(|i| i.id.clone()).collect();
        // Stable: the unranked items compare equal.
        self.items.sort_by_key(|i| (i.rank.is_none(), i.rank));
        let changed = self
            .items
            .iter()
            .zip(before.iter())
            .any(|(i, id)| i.id != *id);
        let transition = if changed {
            Transition::Applied
        } else {
            Transition::Ignored
        };
        self.finish("sort", 0, transition)
    }

    /// Swaps the item at `position` with the closest ranked item above it.
    ///
    /// `rank` is the rank held at `position`. Both positions keep their rank, so the
    /// item moving up takes the rank of the slot it moves into.
    pub fn move_up(&mut self, position: usize, rank: Rank) -> Result<Transition, SelectionErrors> {
        if !self.check_rank(position, rank)? {
            return Ok(self.ignore("move_up", position, "unranked item"));
        }
        if position == 0 {
            return Ok(self.ignore("move_up", position, "first position"));
        }
        let anchor = self.items[..position].iter().rposition(|i| i.is_ranked());
        match anchor {
            Some(anchor) => {
                self.swap_slots(position, anchor);
                Ok(self.finish("move_up", position, Transition::Applied))
            }
            None => Ok(self.ignore("move_up", position, "no ranked item above")),
        }
    }

    /// Swaps the item at `position` with the closest ranked item below it.
    ///
    /// See `move_up`.
    pub fn move_down(
        &mut self,
        position: usize,
        rank: Rank,
    ) -> Result<Transition, SelectionErrors> {
        if !self.check_rank(position, rank)? {
            return Ok(self.ignore("move_down", position, "unranked item"));
        }
        let anchor = self.items[position + 1..]
            .iter()
            .position(|i| i.is_ranked())
            .map(|offset| offset + position + 1);
        match anchor {
            Some(anchor) => {
                self.swap_slots(position, anchor);
                Ok(self.finish("move_down", position, Transition::Applied))
            }
            None => Ok(self.ignore("move_down", position, "no ranked item below")),
        }
    }

    /// Exchanges `rank` with the next more preferred rank in use. The list does not move.
    pub fn raise_rank(
        &mut self,
        position: usize,
        rank: Rank,
    ) -> Result<Transition, SelectionErrors> {
        if !self.check_rank(position, rank)? {
            return Ok(self.ignore("raise_rank", position, "unranked item"));
        }
        if rank == 0 {
            return Ok(self.ignore("raise_rank", position, "already most preferred"));
        }
        let other = self
            .assignment
            .predecessor(rank)
            .and_then(|r| self.assignment.position_of_rank(r));
        match other {
            Some(other) => {
                let transition = self.policy.exchange_ranks(&mut self.items, position, other);
                Ok(self.finish("raise_rank", position, transition))
            }
            None => Ok(self.ignore("raise_rank", position, "no more preferred rank")),
        }
    }

    /// Exchanges `rank` with the next less preferred rank in use. The list does not move.
    pub fn lower_rank(
        &mut self,
        position: usize,
        rank: Rank,
    ) -> Result<Transition, SelectionErrors> {
        if !self.check_rank(position, rank)? {
            return Ok(self.ignore("lower_rank", position, "unranked item"));
        }
        if self.assignment.lowest_rank() == Some(rank) {
            return Ok(self.ignore("lower_rank", position, "already least preferred"));
        }
        let other = self
            .assignment
            .successor(rank)
            .and_then(|r| self.assignment.position_of_rank(r));
        match other {
            Some(other) => {
                let transition = self.policy.exchange_ranks(&mut self.items, position, other);
                Ok(self.finish("lower_rank", position, transition))
            }
            None => Ok(self.ignore("lower_rank", position, "no less preferred rank")),
        }
    }

    /// The up control of the item at `position`, as wired for the given mode.
    pub fn press_up(
        &mut self,
        position: usize,
        mode: MoveMode,
    ) -> Result<Transition, SelectionErrors> {
        let f = self.flags(position, mode)?;
        let rank = self.items[position].rank;
        match rank {
            Some(rank) if !f.up_control_hidden => match mode {
                MoveMode::ByPosition => self.move_up(position, rank),
                MoveMode::ByRank => self.raise_rank(position, rank),
            },
            _ => Ok(self.ignore("press_up", position, "control hidden")),
        }
    }

    /// The down control of the item at `position`, as wired for the given mode.
    pub fn press_down(
        &mut self,
        position: usize,
        mode: MoveMode,
    ) -> Result<Transition, SelectionErrors> {
        let f = self.flags(position, mode)?;
        let rank = self.items[position].rank;
        match rank {
            Some(rank) if !f.down_control_hidden => match mode {
                MoveMode::ByPosition => self.move_down(position, rank),
                MoveMode::ByRank => self.lower_rank(position, rank),
            },
            _ => Ok(self.ignore("press_down", position, "control hidden")),
        }
    }

    /// Replaces the whole list at once. Used to commit a drag.
    pub(crate) fn replace_items(&mut self, items: Vec<Item>) {
        debug_assert_eq!(items.len(), self.items.len());
        self.items = items;
        self.refresh();
        debug!(
            "replace_items: version {} order {:?}",
            self.version,
            self.items.iter().map(|i| &i.id).collect::<Vec<_>>()
        );
    }

    // Trades the items at two positions, leaving each position its rank.
    fn swap_slots(&mut self, position: usize, anchor: usize) {
        let position_rank = self.items[position].rank;
        let anchor_rank = self.items[anchor].rank;
        self.items.swap(position, anchor);
        self.items[position].rank = position_rank;
        self.items[anchor].rank = anchor_rank;
    }

    fn check_position(&self, position: usize) -> Result<(), SelectionErrors> {
        if position < self.items.len() {
            Ok(())
        } else {
            Err(SelectionErrors::PositionOutOfRange {
                position,
                len: self.items.len(),
            })
        }
    }

    // Returns whether the item at the position is ranked. A ranked item must hold `rank`.
    fn check_rank(&self, position: usize, rank: Rank) -> Result<bool, SelectionErrors> {
        self.check_position(position)?;
        match self.items[position].rank {
            None => Ok(false),
            Some(r) if r == rank => Ok(true),
            found => Err(SelectionErrors::RankMismatch {
                position,
                expected: rank,
                found,
            }),
        }
    }

    fn refresh(&mut self) {
        self.assignment = RankAssignment::from_items(&self.items, self.max_rank);
        self.version += 1;
    }

    fn finish(&mut self, op: &str, position: usize, transition: Transition) -> Transition {
        match transition {
            Transition::Applied => {
                self.refresh();
                debug!(
                    "{}: position {}: version {} ranks {:?} current rank {}",
                    op,
                    position,
                    self.version,
                    self.ranks(),
                    self.assignment.current_rank()
                );
            }
            Transition::Ignored => {
                debug!("{}: position {}: ignored by policy", op, position);
            }
        }
        transition
    }

    fn ignore(&self, op: &str, position: usize, reason: &str) -> Transition {
        debug!("{}: position {}: ignored: {}", op, position, reason);
        Transition::Ignored
    }
}
