//! Per-item flags consumed by a ballot renderer.
//!
//! The flags are pure functions of the list, the assignment derived from it and the
//! control mode. `FlagCache` keeps the last computed set for a given engine and version.

use crate::assignment::RankAssignment;
use crate::config::{Item, MoveMode};
use crate::SelectionEngine;

#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct ItemFlags {
    pub is_ranked: bool,
    pub is_highest_ranked: bool,
    pub is_lowest_ranked: bool,
    pub is_first_ranked_position: bool,
    pub is_last_ranked_position: bool,
    /// The item cannot be selected because all the ranks are taken.
    pub tap_disabled: bool,
    pub up_control_hidden: bool,
    pub down_control_hidden: bool,
}

/// Computes the flags of the item at `position`.
///
/// Panics if `position` is out of range.
pub fn item_flags(
    items: &[Item],
    assignment: &RankAssignment,
    position: usize,
    mode: MoveMode,
) -> ItemFlags {
    let rank = items[position].rank;
    let is_ranked = rank.is_some();
    let is_highest_ranked = is_ranked && rank == assignment.highest_rank();
    let is_lowest_ranked = is_ranked && rank == assignment.lowest_rank();
    let is_first_ranked_position = assignment.first_ranked_position() == Some(position);
    let is_last_ranked_position = assignment.last_ranked_position() == Some(position);
    let (up_edge, down_edge) = match mode {
        MoveMode::ByPosition => (is_first_ranked_position, is_last_ranked_position),
        MoveMode::ByRank => (is_highest_ranked, is_lowest_ranked),
    };
    ItemFlags {
        is_ranked,
        is_highest_ranked,
        is_lowest_ranked,
        is_first_ranked_position,
        is_last_ranked_position,
        tap_disabled: assignment.contract_met() && !is_ranked,
        up_control_hidden: up_edge || !is_ranked,
        down_control_hidden: down_edge || !is_ranked,
    }
}

/// The flags of all the items, in list order.
pub fn all_flags(items: &[Item], assignment: &RankAssignment, mode: MoveMode) -> Vec<ItemFlags> {
    (0..items.len())
        .map(|position| item_flags(items, assignment, position, mode))
        .collect()
}

/// The label shown in the rank box of an item, counting from 1.
///
/// An unranked item shows the rank it would receive, or a dash when the ballot is full.
pub fn rank_label(item: &Item, assignment: &RankAssignment) -> String {
    match item.rank {
        Some(rank) => (rank + 1).to_string(),
        None if assignment.contract_met() => "—".to_string(),
        None => (assignment.current_rank() + 1).to_string(),
    }
}

/// Memoizes the flags of an engine, keyed on the engine instance, its state version
/// and the control mode.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct FlagCache {
    key: Option<(u64, u64, MoveMode)>,
    flags: Vec<ItemFlags>,
}

impl FlagCache {
    pub fn new() -> FlagCache {
        FlagCache::default()
    }

    pub fn flags(&mut self, engine: &SelectionEngine, mode: MoveMode) -> &[ItemFlags] {
        let key = (engine.instance(), engine.version(), mode);
        if self.key != Some(key) {
            self.flags = all_flags(engine.items(), engine.assignment(), mode);
            self.key = Some(key);
        }
        &self.flags
    }

    /// True if the next call with these arguments is served from the cache.
    pub fn is_fresh(&self, engine: &SelectionEngine, mode: MoveMode) -> bool {
        self.key == Some((engine.instance(), engine.version(), mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ContestRules, Rank};

    fn items(ranks: &[Option<Rank>]) -> Vec<Item> {
        ranks
            .iter()
            .enumerate()
            .map(|(idx, r)| Item {
                rank: *r,
                ..Item::new(&format!("c{}", idx), &format!("C{}", idx), None)
            })
            .collect()
    }

    #[test]
    fn flags_by_rank() {
        // Unsorted: the highest rank is in the middle of the list.
        let l = items(&[Some(1), Some(0), None, Some(2)]);
        let a = RankAssignment::from_items(&l, 4);
        let f = all_flags(&l, &a, MoveMode::ByRank);
        assert!(f[1].is_highest_ranked && f[1].up_control_hidden && !f[1].down_control_hidden);
        assert!(f[3].is_lowest_ranked && f[3].down_control_hidden && !f[3].up_control_hidden);
        assert!(!f[0].up_control_hidden && !f[0].down_control_hidden);
        assert!(f[2].up_control_hidden && f[2].down_control_hidden);
        assert!(!f[2].tap_disabled);
    }

    #[test]
    fn flags_by_position() {
        let l = items(&[None, Some(1), Some(0), Some(2), None]);
        let a = RankAssignment::from_items(&l, 3);
        let f = all_flags(&l, &a, MoveMode::ByPosition);
        assert!(f[1].is_first_ranked_position && f[1].up_control_hidden);
        assert!(!f[1].down_control_hidden);
        assert!(f[3].is_last_ranked_position && f[3].down_control_hidden);
        assert!(!f[2].up_control_hidden && !f[2].down_control_hidden);
        assert!(f[0].tap_disabled && f[4].tap_disabled);
        assert!(!f[0].is_ranked);
    }

    #[test]
    fn single_ranked_item_hides_both_controls() {
        let l = items(&[None, Some(0)]);
        let a = RankAssignment::from_items(&l, 2);
        for mode in [MoveMode::ByRank, MoveMode::ByPosition] {
            let f = item_flags(&l, &a, 1, mode);
            assert!(f.up_control_hidden && f.down_control_hidden);
        }
    }

    #[test]
    fn labels() {
        let l = items(&[Some(0), None]);
        let a = RankAssignment::from_items(&l, 2);
        assert_eq!(rank_label(&l[0], &a), "1");
        assert_eq!(rank_label(&l[1], &a), "2");
        let full = items(&[Some(0), None]);
        let a = RankAssignment::from_items(&full, 1);
        assert_eq!(rank_label(&full[1], &a), "—");
    }

    #[test]
    fn cache_follows_version() {
        let mut engine =
            SelectionEngine::new(items(&[None, None]), &ContestRules::with_max_rank(2)).unwrap();
        let mut cache = FlagCache::new();
        assert!(!cache.is_fresh(&engine, MoveMode::ByRank));
        assert!(!cache.flags(&engine, MoveMode::ByRank)[0].is_ranked);
        assert!(cache.is_fresh(&engine, MoveMode::ByRank));
        assert!(!cache.is_fresh(&engine, MoveMode::ByPosition));
        engine.select(0).unwrap();
        assert!(!cache.is_fresh(&engine, MoveMode::ByRank));
        assert!(cache.flags(&engine, MoveMode::ByRank)[0].is_ranked);
    }

    #[test]
    fn cache_is_not_shared_between_engines() {
        let a = SelectionEngine::new(items(&[Some(0), None]), &ContestRules::with_max_rank(2))
            .unwrap();
        let b = SelectionEngine::new(items(&[None, None]), &ContestRules::with_max_rank(2))
            .unwrap();
        assert_eq!(a.version(), b.version());
        let mut cache = FlagCache::new();
        assert!(cache.flags(&a, MoveMode::ByRank)[0].is_ranked);
        assert!(!cache.is_fresh(&b, MoveMode::ByRank));
        assert!(!cache.flags(&b, MoveMode::ByRank)[0].is_ranked);
    }
}
