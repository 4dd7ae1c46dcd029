pub use crate::config::*;
use crate::SelectionEngine;

/// A builder for assembling the roster of a contest.
///
/// ```
/// pub use ranked_selection::builder::Builder;
/// pub use ranked_selection::ContestRules;
/// # use ranked_selection::SelectionErrors;
///
/// let mut builder = Builder::new(&ContestRules::DEFAULT_RULES)?
///     .candidates(&["Anna".to_string(), "Bob".to_string()])?;
///
/// builder.add_item("write-in", "Clara", Some("Independent"))?;
///
/// let engine = builder.build()?;
/// assert_eq!(engine.items()[0].id, "candidate-0");
///
/// # Ok::<(), SelectionErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: ContestRules,
    pub(crate) _items: Vec<Item>,
}

impl Builder {
    pub fn new(rules: &ContestRules) -> Result<Builder, SelectionErrors> {
        if rules.max_rank == 0 {
            return Err(SelectionErrors::InvalidMaxRank);
        }
        Ok(Builder {
            _rules: rules.clone(),
            _items: Vec::new(),
        })
    }

    /// Replaces the roster with unranked items named after `names`.
    ///
    /// The items get the ids `candidate-0`, `candidate-1`, ... in the given order.
    pub fn candidates(self, names: &[String]) -> Result<Builder, SelectionErrors> {
        Ok(Builder {
            _rules: self._rules,
            _items: names
                .iter()
                .enumerate()
                .map(|(idx, name)| Item::new(&format!("candidate-{}", idx), name, None))
                .collect(),
        })
    }

    /// Appends an unranked item to the roster.
    pub fn add_item(
        &mut self,
        id: &str,
        name: &str,
        group: Option<&str>,
    ) -> Result<(), SelectionErrors> {
        self.add_ranked_item(&Item::new(id, name, group))
    }

    /// Appends an item, which may carry a rank already (a resumed ballot).
    pub fn add_ranked_item(&mut self, item: &Item) -> Result<(), SelectionErrors> {
        if self._items.iter().any(|i| i.id == item.id) {
            return Err(SelectionErrors::DuplicateItem(item.id.clone()));
        }
        self._items.push(item.clone());
        Ok(())
    }

    pub fn build(self) -> Result<SelectionEngine, SelectionErrors> {
        SelectionEngine::new(self._items, &self._rules)
    }
}
