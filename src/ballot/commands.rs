// The commands a ballot interface sends to the engine, as read from a session file.

use crate::ballot::config_reader::ModeName;
use crate::ballot::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    Select { position: usize },
    SelectId { id: String },
    Sort,
    // The move commands use the rank currently held at the position.
    MoveUp { position: usize },
    MoveDown { position: usize },
    RaiseRank { position: usize },
    LowerRank { position: usize },
    PressUp { position: usize },
    PressDown { position: usize },
    SetMode { mode: ModeName },
    BeginReorder,
    UpdatePosition { id: String, position: usize },
    CommitReorder { order: Vec<String> },
    CommitLive,
    CancelReorder,
}

/// An engine together with the state a ballot interface keeps around it: the mode of
/// the up/down controls and the drag in progress.
#[derive(Debug)]
pub struct Session {
    engine: SelectionEngine,
    reorder: ReorderCoordinator,
    mode: MoveMode,
}

fn rank_at(engine: &SelectionEngine, position: usize) -> Result<Option<Rank>, SelectionErrors> {
    Ok(engine.item(position)?.rank)
}

impl Session {
    pub fn new(engine: SelectionEngine, mode: MoveMode) -> Session {
        Session {
            engine,
            reorder: ReorderCoordinator::new(),
            mode,
        }
    }

    pub fn engine(&self) -> &SelectionEngine {
        &self.engine
    }

    pub fn mode(&self) -> MoveMode {
        self.mode
    }

    pub fn apply(&mut self, command: &Command) -> Result<Transition, SelectionErrors> {
        let engine = &mut self.engine;
        match command {
            Command::Select { position } => engine.select(*position),
            Command::SelectId { id } => engine.select_id(id),
            Command::Sort => Ok(engine.sort()),
            Command::MoveUp { position } => match rank_at(engine, *position)? {
                Some(rank) => engine.move_up(*position, rank),
                None => Ok(Transition::Ignored),
            },
            Command::MoveDown { position } => match rank_at(engine, *position)? {
                Some(rank) => engine.move_down(*position, rank),
                None => Ok(Transition::Ignored),
            },
            Command::RaiseRank { position } => match rank_at(engine, *position)? {
                Some(rank) => engine.raise_rank(*position, rank),
                None => Ok(Transition::Ignored),
            },
            Command::LowerRank { position } => match rank_at(engine, *position)? {
                Some(rank) => engine.lower_rank(*position, rank),
                None => Ok(Transition::Ignored),
            },
            Command::PressUp { position } => engine.press_up(*position, self.mode),
            Command::PressDown { position } => engine.press_down(*position, self.mode),
            Command::SetMode { mode } => {
                self.mode = MoveMode::from(*mode);
                debug!("apply: mode set to {:?}", self.mode);
                Ok(Transition::Applied)
            }
            Command::BeginReorder => {
                self.reorder.begin_reorder(engine);
                Ok(Transition::Applied)
            }
            Command::UpdatePosition { id, position } => {
                self.reorder.update_position(id, *position)?;
                Ok(Transition::Applied)
            }
            Command::CommitReorder { order } => {
                self.reorder.commit_reorder(engine, order)?;
                Ok(Transition::Applied)
            }
            Command::CommitLive => {
                self.reorder.commit_live(engine)?;
                Ok(Transition::Applied)
            }
            Command::CancelReorder => {
                self.reorder.cancel_reorder();
                Ok(Transition::Applied)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(names: &[&str], max_rank: u32) -> Session {
        let items: Vec<Item> = names
            .iter()
            .enumerate()
            .map(|(idx, n)| Item::new(&format!("candidate-{}", idx), n, None))
            .collect();
        let engine = SelectionEngine::new(items, &ContestRules::with_max_rank(max_rank)).unwrap();
        Session::new(engine, MoveMode::ByRank)
    }

    #[test]
    fn parses_commands() {
        let js = r#"[
            {"command": "select", "position": 0},
            {"command": "selectId", "id": "candidate-2"},
            {"command": "sort"},
            {"command": "setMode", "mode": "position"},
            {"command": "updatePosition", "id": "candidate-1", "position": 0},
            {"command": "commitReorder", "order": ["candidate-1", "candidate-0"]}
        ]"#;
        let commands: Vec<Command> = serde_json::from_str(js).unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Select { position: 0 },
                Command::SelectId {
                    id: "candidate-2".to_string()
                },
                Command::Sort,
                Command::SetMode {
                    mode: ModeName::Position
                },
                Command::UpdatePosition {
                    id: "candidate-1".to_string(),
                    position: 0
                },
                Command::CommitReorder {
                    order: vec!["candidate-1".to_string(), "candidate-0".to_string()]
                },
            ]
        );
    }

    #[test]
    fn moves_on_unranked_items_are_ignored() {
        let mut s = session(&["A", "B"], 2);
        assert_eq!(
            s.apply(&Command::MoveDown { position: 0 }),
            Ok(Transition::Ignored)
        );
        assert_eq!(
            s.apply(&Command::RaiseRank { position: 1 }),
            Ok(Transition::Ignored)
        );
        assert_eq!(
            s.apply(&Command::MoveUp { position: 2 }),
            Err(SelectionErrors::PositionOutOfRange { position: 2, len: 2 })
        );
    }

    #[test]
    fn press_follows_mode() {
        let mut s = session(&["A", "B", "C"], 3);
        s.apply(&Command::Select { position: 0 }).unwrap();
        s.apply(&Command::Select { position: 2 }).unwrap();
        // By rank: C (rank 1) takes rank 0, the list does not move.
        assert!(s.apply(&Command::PressUp { position: 2 }).unwrap().is_applied());
        assert_eq!(s.engine().ranks(), vec![Some(1), None, Some(0)]);
        s.apply(&Command::SetMode {
            mode: ModeName::Position,
        })
        .unwrap();
        // By position: C trades places with A, the ranks stay in place.
        assert!(s.apply(&Command::PressUp { position: 2 }).unwrap().is_applied());
        // A now holds the last ranked position, so its down control is hidden.
        assert!(!s.apply(&Command::PressDown { position: 2 }).unwrap().is_applied());
        assert_eq!(s.engine().ranks(), vec![Some(1), None, Some(0)]);
        assert_eq!(s.engine().items()[0].name, "C");
    }
}
