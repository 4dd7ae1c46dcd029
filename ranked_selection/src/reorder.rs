use std::collections::{HashMap, HashSet};

use log::{debug, info};

use crate::config::{Item, Rank, SelectionErrors};
use crate::SelectionEngine;

// The state captured when a drag starts.
#[derive(Eq, PartialEq, Debug, Clone)]
struct ReorderSession {
    // id -> live position
    positions: HashMap<String, usize>,
    // The rank held by each position when the drag started.
    slot_ranks: Vec<Option<Rank>>,
    items: Vec<Item>,
    max_rank: Rank,
    instance: u64,
    version: u64,
}

impl ReorderSession {
    // The engine must be the one the gesture started on, unchanged since.
    fn matches(&self, engine: &SelectionEngine) -> bool {
        self.instance == engine.instance()
            && self.version == engine.version()
            && self.max_rank == engine.max_rank()
            && self.items.len() == engine.len()
            && engine
                .items()
                .iter()
                .all(|i| self.positions.contains_key(&i.id))
    }

    fn reordered_items(&self, final_order: &[String]) -> Result<Vec<Item>, SelectionErrors> {
        if final_order.len() != self.items.len() {
            return Err(SelectionErrors::InvalidOrder);
        }
        let by_id: HashMap<&str, &Item> = self.items.iter().map(|i| (i.id.as_str(), i)).collect();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut reordered: Vec<Item> = Vec::with_capacity(final_order.len());
        for (position, id) in final_order.iter().enumerate() {
            let item = by_id
                .get(id.as_str())
                .ok_or_else(|| SelectionErrors::UnknownItem(id.clone()))?;
            if !seen.insert(id.as_str()) {
                return Err(SelectionErrors::InvalidOrder);
            }
            reordered.push(Item {
                rank: self.slot_ranks[position],
                ..(*item).clone()
            });
        }
        Ok(reordered)
    }
}

/// Free-form reordering of a ballot, typically driven by a drag gesture.
///
/// While a gesture is running, the coordinator tracks a live position for every
/// item and leaves the engine untouched. On commit, the new order is written back
/// in one step and every position keeps the rank it held before the gesture: the
/// rank follows the slot, not the item.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ReorderCoordinator {
    session: Option<ReorderSession>,
}

impl ReorderCoordinator {
    pub fn new() -> ReorderCoordinator {
        ReorderCoordinator::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Snapshots the positions and slot ranks of the engine. Restarts any gesture
    /// already in progress.
    pub fn begin_reorder(&mut self, engine: &SelectionEngine) {
        let items = engine.items().to_vec();
        let positions: HashMap<String, usize> = items
            .iter()
            .enumerate()
            .map(|(idx, i)| (i.id.clone(), idx))
            .collect();
        let slot_ranks: Vec<Option<Rank>> = items.iter().map(|i| i.rank).collect();
        if self.session.is_some() {
            debug!("begin_reorder: discarding the previous gesture");
        }
        debug!("begin_reorder: version {} slots {:?}", engine.version(), slot_ranks);
        self.session = Some(ReorderSession {
            positions,
            slot_ranks,
            items,
            max_rank: engine.max_rank(),
            instance: engine.instance(),
            version: engine.version(),
        });
    }

    /// Moves `id` to `new_position` in the live map. The item currently at
    /// `new_position` takes the old position of `id`.
    pub fn update_position(&mut self, id: &str, new_position: usize) -> Result<(), SelectionErrors> {
        let session = self
            .session
            .as_mut()
            .ok_or(SelectionErrors::NoReorderInProgress)?;
        let len = session.slot_ranks.len();
        if new_position >= len {
            return Err(SelectionErrors::PositionOutOfRange {
                position: new_position,
                len,
            });
        }
        let from = *session
            .positions
            .get(id)
            .ok_or_else(|| SelectionErrors::UnknownItem(id.to_string()))?;
        if from == new_position {
            return Ok(());
        }
        for position in session.positions.values_mut() {
            if *position == from {
                *position = new_position;
            } else if *position == new_position {
                *position = from;
            }
        }
        debug!("update_position: {} {} -> {}", id, from, new_position);
        Ok(())
    }

    /// The live position of an item during a gesture.
    pub fn live_position(&self, id: &str) -> Option<usize> {
        self.session
            .as_ref()
            .and_then(|s| s.positions.get(id).cloned())
    }

    /// The ids in live order. Empty when no gesture is in progress.
    pub fn live_order(&self) -> Vec<String> {
        match &self.session {
            Some(session) => {
                let mut ids: Vec<(&String, &usize)> = session.positions.iter().collect();
                ids.sort_by_key(|(_, position)| **position);
                ids.into_iter().map(|(id, _)| id.clone()).collect()
            }
            None => Vec::new(),
        }
    }

    /// Writes `final_order` back into the engine and ends the gesture.
    ///
    /// Each position receives the rank it held when the gesture started. Returns
    /// `StaleReorder` unless `engine` is the one passed to `begin_reorder`, unchanged
    /// since. On error, the engine and the gesture are left as they were.
    pub fn commit_reorder(
        &mut self,
        engine: &mut SelectionEngine,
        final_order: &[String],
    ) -> Result<(), SelectionErrors> {
        let session = self
            .session
            .as_ref()
            .ok_or(SelectionErrors::NoReorderInProgress)?;
        if !session.matches(engine) {
            return Err(SelectionErrors::StaleReorder);
        }
        let reordered = session.reordered_items(final_order)?;
        info!("commit_reorder: new order {:?}", final_order);
        engine.replace_items(reordered);
        self.session = None;
        Ok(())
    }

    /// Commits the live order of the gesture.
    pub fn commit_live(&mut self, engine: &mut SelectionEngine) -> Result<(), SelectionErrors> {
        if self.session.is_none() {
            return Err(SelectionErrors::NoReorderInProgress);
        }
        let order = self.live_order();
        self.commit_reorder(engine, &order)
    }

    /// Abandons the gesture. The engine is not touched.
    pub fn cancel_reorder(&mut self) {
        if self.session.take().is_some() {
            debug!("cancel_reorder: gesture discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContestRules;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn engine(ranks: &[Option<Rank>]) -> SelectionEngine {
        init();
        let items: Vec<Item> = ranks
            .iter()
            .enumerate()
            .map(|(idx, r)| Item {
                rank: *r,
                ..Item::new(&format!("c{}", idx), &format!("C{}", idx), None)
            })
            .collect();
        SelectionEngine::new(items, &ContestRules::with_max_rank(3)).unwrap()
    }

    fn ids(e: &SelectionEngine) -> Vec<String> {
        e.items().iter().map(|i| i.id.clone()).collect()
    }

    fn order(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn commit_keeps_slot_ranks() {
        let mut e = engine(&[Some(0), Some(1), None, Some(2)]);
        let mut c = ReorderCoordinator::new();
        c.begin_reorder(&e);
        c.commit_reorder(&mut e, &order(&["c3", "c2", "c0", "c1"]))
            .unwrap();
        assert_eq!(ids(&e), order(&["c3", "c2", "c0", "c1"]));
        assert_eq!(e.ranks(), vec![Some(0), Some(1), None, Some(2)]);
        assert!(!c.is_active());
        assert_eq!(*e.assignment(), crate::RankAssignment::from_items(e.items(), 3));
    }

    #[test]
    fn live_positions_swap_pairwise() {
        let e = engine(&[Some(0), None, Some(1), None]);
        let mut c = ReorderCoordinator::new();
        c.begin_reorder(&e);
        c.update_position("c0", 2).unwrap();
        assert_eq!(c.live_order(), order(&["c2", "c1", "c0", "c3"]));
        c.update_position("c0", 3).unwrap();
        assert_eq!(c.live_order(), order(&["c2", "c1", "c3", "c0"]));
        assert_eq!(c.live_position("c0"), Some(3));
        // Nothing is written until the commit.
        assert_eq!(ids(&e), order(&["c0", "c1", "c2", "c3"]));
    }

    #[test]
    fn commit_live_order() {
        let mut e = engine(&[Some(0), None, Some(1)]);
        let mut c = ReorderCoordinator::new();
        c.begin_reorder(&e);
        c.update_position("c2", 0).unwrap();
        c.commit_live(&mut e).unwrap();
        assert_eq!(ids(&e), order(&["c2", "c1", "c0"]));
        // c2 held rank 1 before the drag; it now sits in the slot of rank 0.
        assert_eq!(e.ranks(), vec![Some(0), None, Some(1)]);
        assert_eq!(e.item(0).unwrap().rank, Some(0));
    }

    #[test]
    fn cancel_leaves_engine_untouched() {
        let e = engine(&[Some(0), Some(1)]);
        let version = e.version();
        let mut c = ReorderCoordinator::new();
        c.begin_reorder(&e);
        c.update_position("c1", 0).unwrap();
        c.cancel_reorder();
        assert!(!c.is_active());
        assert!(c.live_order().is_empty());
        assert_eq!(ids(&e), order(&["c0", "c1"]));
        assert_eq!(e.version(), version);
    }

    #[test]
    fn reorder_errors() {
        let mut e = engine(&[Some(0), None]);
        let mut c = ReorderCoordinator::new();
        assert_eq!(
            c.update_position("c0", 1),
            Err(SelectionErrors::NoReorderInProgress)
        );
        assert_eq!(c.commit_live(&mut e), Err(SelectionErrors::NoReorderInProgress));
        c.begin_reorder(&e);
        assert_eq!(
            c.update_position("c9", 1),
            Err(SelectionErrors::UnknownItem("c9".to_string()))
        );
        assert_eq!(
            c.update_position("c0", 2),
            Err(SelectionErrors::PositionOutOfRange { position: 2, len: 2 })
        );
        assert_eq!(
            c.commit_reorder(&mut e, &order(&["c0", "c0"])),
            Err(SelectionErrors::InvalidOrder)
        );
        assert_eq!(
            c.commit_reorder(&mut e, &order(&["c0"])),
            Err(SelectionErrors::InvalidOrder)
        );
        assert!(c.is_active());
        e.select(1).unwrap();
        assert_eq!(
            c.commit_reorder(&mut e, &order(&["c1", "c0"])),
            Err(SelectionErrors::StaleReorder)
        );
        assert_eq!(ids(&e), order(&["c0", "c1"]));
    }

    #[test]
    fn commit_into_another_engine_is_refused() {
        let a = engine(&[Some(0), Some(1), Some(2)]);
        let items: Vec<Item> = (0..3)
            .map(|idx| Item::new(&format!("b{}", idx), &format!("B{}", idx), None))
            .collect();
        let mut b = SelectionEngine::new(items, &ContestRules::with_max_rank(1)).unwrap();
        assert_eq!(a.version(), b.version());
        let mut c = ReorderCoordinator::new();
        c.begin_reorder(&a);
        assert_eq!(c.commit_live(&mut b), Err(SelectionErrors::StaleReorder));
        assert_eq!(ids(&b), order(&["b0", "b1", "b2"]));
        assert_eq!(b.ranks(), vec![None, None, None]);
        assert!(c.is_active());

        // Same roster and version, but still a different engine.
        let mut twin = engine(&[Some(0), Some(1), Some(2)]);
        assert_eq!(
            c.commit_reorder(&mut twin, &order(&["c2", "c1", "c0"])),
            Err(SelectionErrors::StaleReorder)
        );
        assert_eq!(ids(&twin), order(&["c0", "c1", "c2"]));
    }
}
