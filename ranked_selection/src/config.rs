// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A rank value. 0 is the most preferred choice.
pub type Rank = u32;

/// One entry of a contest roster.
///
/// Items are created once per contest. Only the rank and the position of the item
/// in the ballot list change during a session.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Item {
    /// Stable identifier, unique within a contest.
    pub id: String,
    pub name: String,
    /// An optional label, such as the party of a candidate.
    pub group: Option<String>,
    pub rank: Option<Rank>,
}

impl Item {
    pub fn new(id: &str, name: &str, group: Option<&str>) -> Item {
        Item {
            id: id.to_string(),
            name: name.to_string(),
            group: group.map(|g| g.to_string()),
            rank: None,
        }
    }

    pub fn is_ranked(&self) -> bool {
        self.rank.is_some()
    }
}

// ******** Output data structures *********

/// The outcome of a command sent to the engine.
///
/// Commands that hit a boundary (ballot full, already first, no neighbour to swap with)
/// are ignored and leave the ballot untouched.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Transition {
    Applied,
    Ignored,
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied)
    }
}

/// Errors signaling that the caller broke a precondition.
///
/// None of these can be triggered by a voter going through a well-behaved interface.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SelectionErrors {
    EmptyRoster,
    InvalidMaxRank,
    DuplicateItem(String),
    UnknownItem(String),
    PositionOutOfRange { position: usize, len: usize },
    RankOutOfRange { rank: Rank, max_rank: Rank },
    DuplicateRank(Rank),
    RankMismatch {
        position: usize,
        expected: Rank,
        found: Option<Rank>,
    },
    UnsupportedPolicy(ControlPolicy),
    NoReorderInProgress,
    StaleReorder,
    InvalidOrder,
}

impl Error for SelectionErrors {}

impl Display for SelectionErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionErrors::EmptyRoster => write!(f, "the roster has no items"),
            SelectionErrors::InvalidMaxRank => write!(f, "the number of ranks must be positive"),
            SelectionErrors::DuplicateItem(id) => write!(f, "item {} appears more than once", id),
            SelectionErrors::UnknownItem(id) => write!(f, "unknown item {}", id),
            SelectionErrors::PositionOutOfRange { position, len } => {
                write!(f, "position {} is out of range (len {})", position, len)
            }
            SelectionErrors::RankOutOfRange { rank, max_rank } => {
                write!(f, "rank {} is out of range (max rank {})", rank, max_rank)
            }
            SelectionErrors::DuplicateRank(rank) => {
                write!(f, "rank {} is held by more than one item", rank)
            }
            SelectionErrors::RankMismatch {
                position,
                expected,
                found,
            } => write!(
                f,
                "item at position {} holds rank {:?}, not {}",
                position, found, expected
            ),
            SelectionErrors::UnsupportedPolicy(p) => {
                write!(f, "control policy {:?} is not implemented", p)
            }
            SelectionErrors::NoReorderInProgress => write!(f, "no reorder in progress"),
            SelectionErrors::StaleReorder => write!(
                f,
                "the reorder did not start on this ballot, or the ballot changed since"
            ),
            SelectionErrors::InvalidOrder => {
                write!(f, "the final order is not a permutation of the roster")
            }
        }
    }
}

// ********* Configuration **********

/// Whether the engine makes decisions on behalf of the voter.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ControlPolicy {
    /// Conflicting ranks are resolved by swapping. Deselecting an item only clears
    /// its own rank.
    Adjudicated,
    /// Conflicts are left to the voter. No behaviour is defined for it yet.
    Uncontrolled,
}

/// Which family of operations the up/down controls of an item invoke.
///
/// - ByPosition: the controls move the item in the list, the ranks stay attached
/// to the list positions. Controls are hidden on the first and last ranked positions.
///
/// - ByRank: the controls exchange rank values with the neighbouring rank, the list
/// does not move. Controls are hidden on the highest and lowest ranks.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum MoveMode {
    ByPosition,
    ByRank,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ContestRules {
    /// The number of preference slots. Ranks live in [0, max_rank).
    pub max_rank: Rank,
    pub control_policy: ControlPolicy,
    /// The mode the controls start in. The engine does not remember later changes.
    pub move_mode: MoveMode,
}

impl ContestRules {
    pub const DEFAULT_RULES: ContestRules = ContestRules {
        max_rank: 3,
        control_policy: ControlPolicy::Adjudicated,
        move_mode: MoveMode::ByRank,
    };

    pub fn with_max_rank(max_rank: Rank) -> ContestRules {
        ContestRules {
            max_rank,
            ..ContestRules::DEFAULT_RULES
        }
    }
}
