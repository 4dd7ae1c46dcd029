use std::collections::{BTreeMap, HashSet};

use crate::config::{Item, Rank, SelectionErrors};

/// The partial, injective mapping from ranks to the list positions holding them.
///
/// It is always derived from the list of items and never updated in place, so it
/// cannot drift from the ballot.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RankAssignment {
    max_rank: Rank,
    // rank -> list position. Ordered, so the keys are the used ranks in ascending order.
    holders: BTreeMap<Rank, usize>,
    first_ranked_position: Option<usize>,
    last_ranked_position: Option<usize>,
}

impl RankAssignment {
    /// Derives the assignment from the current list.
    ///
    /// The items are expected to satisfy the rank invariants. Use `validate` for
    /// lists coming from outside the engine.
    pub fn from_items(items: &[Item], max_rank: Rank) -> RankAssignment {
        let mut holders: BTreeMap<Rank, usize> = BTreeMap::new();
        for (position, item) in items.iter().enumerate() {
            if let Some(rank) = item.rank {
                debug_assert!(
                    rank < max_rank,
                    "rank {} out of range at position {}",
                    rank,
                    position
                );
                let previous = holders.insert(rank, position);
                debug_assert!(
                    previous.is_none(),
                    "rank {} held by positions {:?} and {}",
                    rank,
                    previous,
                    position
                );
            }
        }
        RankAssignment {
            max_rank,
            holders,
            first_ranked_position: items.iter().position(|i| i.is_ranked()),
            last_ranked_position: items.iter().rposition(|i| i.is_ranked()),
        }
    }

    /// Checks the roster invariants: unique ids, ranks in range, no shared rank.
    pub fn validate(items: &[Item], max_rank: Rank) -> Result<(), SelectionErrors> {
        if max_rank == 0 {
            return Err(SelectionErrors::InvalidMaxRank);
        }
        if items.is_empty() {
            return Err(SelectionErrors::EmptyRoster);
        }
        let mut ids: HashSet<&str> = HashSet::new();
        let mut ranks: HashSet<Rank> = HashSet::new();
        for item in items.iter() {
            if !ids.insert(item.id.as_str()) {
                return Err(SelectionErrors::DuplicateItem(item.id.clone()));
            }
            if let Some(rank) = item.rank {
                if rank >= max_rank {
                    return Err(SelectionErrors::RankOutOfRange { rank, max_rank });
                }
                if !ranks.insert(rank) {
                    return Err(SelectionErrors::DuplicateRank(rank));
                }
            }
        }
        Ok(())
    }

    pub fn max_rank(&self) -> Rank {
        self.max_rank
    }

    /// The assigned ranks, in ascending order.
    pub fn used_ranks(&self) -> Vec<Rank> {
        self.holders.keys().cloned().collect()
    }

    /// The ranks still available, in ascending order.
    pub fn free_ranks(&self) -> Vec<Rank> {
        (0..self.max_rank)
            .filter(|r| !self.holders.contains_key(r))
            .collect()
    }

    /// The rank the next selected item receives, or `max_rank` when all the
    /// slots are taken.
    pub fn current_rank(&self) -> Rank {
        (0..self.max_rank)
            .find(|r| !self.holders.contains_key(r))
            .unwrap_or(self.max_rank)
    }

    pub fn contract_met(&self) -> bool {
        self.current_rank() == self.max_rank
    }

    /// The most preferred rank in use (numerically smallest).
    pub fn highest_rank(&self) -> Option<Rank> {
        self.holders.keys().next().cloned()
    }

    /// The least preferred rank in use (numerically largest).
    pub fn lowest_rank(&self) -> Option<Rank> {
        self.holders.keys().next_back().cloned()
    }

    pub fn position_of_rank(&self, rank: Rank) -> Option<usize> {
        self.holders.get(&rank).cloned()
    }

    /// The used rank just before `rank`. Gaps between used ranks are skipped.
    pub fn predecessor(&self, rank: Rank) -> Option<Rank> {
        self.holders.range(..rank).next_back().map(|(r, _)| *r)
    }

    /// The used rank just after `rank`. Gaps between used ranks are skipped.
    pub fn successor(&self, rank: Rank) -> Option<Rank> {
        self.holders
            .range(rank.saturating_add(1)..)
            .next()
            .map(|(r, _)| *r)
    }

    pub fn first_ranked_position(&self) -> Option<usize> {
        self.first_ranked_position
    }

    pub fn last_ranked_position(&self) -> Option<usize> {
        self.last_ranked_position
    }

    pub fn num_ranked(&self) -> usize {
        self.holders.len()
    }

    /// True when the ranked items, read in list order, carry the ranks 0, 1, 2, ...
    pub fn is_sorted(&self) -> bool {
        let mut positions: Vec<usize> = self.holders.values().cloned().collect();
        positions.sort_unstable();
        positions
            .iter()
            .enumerate()
            .all(|(idx, pos)| self.holders.get(&(idx as Rank)) == Some(pos))
    }
}
