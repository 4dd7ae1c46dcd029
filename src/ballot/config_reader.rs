use crate::ballot::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeName {
    Rank,
    Position,
}

impl From<ModeName> for MoveMode {
    fn from(m: ModeName) -> MoveMode {
        match m {
            ModeName::Rank => MoveMode::ByRank,
            ModeName::Position => MoveMode::ByPosition,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ContestCandidate {
    pub id: Option<String>,
    pub name: String,
    pub party: Option<String>,
    pub rank: Option<u32>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ContestConfig {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "maxRank")]
    pub max_rank: u32,
    #[serde(rename = "controlType")]
    pub control_type: Option<String>,
    #[serde(rename = "moveType")]
    pub move_type: Option<ModeName>,
    pub candidates: Vec<ContestCandidate>,
    pub commands: Option<Vec<Command>>,
}

impl ContestConfig {
    pub fn control_policy(&self) -> BallotResult<ControlPolicy> {
        match self.control_type.as_deref() {
            None | Some("adjudicated") => Ok(ControlPolicy::Adjudicated),
            Some("uncontrolled") => Ok(ControlPolicy::Uncontrolled),
            Some(x) => whatever!("unknown control type: {}", x),
        }
    }
}

pub fn parse_mode(s: &str) -> BallotResult<MoveMode> {
    match s {
        "rank" => Ok(MoveMode::ByRank),
        "position" => Ok(MoveMode::ByPosition),
        x => whatever!("unknown move mode {:?}: expected 'rank' or 'position'", x),
    }
}

pub fn validate_rules(config: &ContestConfig, mode: Option<&str>) -> BallotResult<ContestRules> {
    let move_mode = match mode {
        Some(m) => parse_mode(m)?,
        None => config
            .move_type
            .map(MoveMode::from)
            .unwrap_or(ContestRules::DEFAULT_RULES.move_mode),
    };
    Ok(ContestRules {
        max_rank: config.max_rank,
        control_policy: config.control_policy()?,
        move_mode,
    })
}

pub fn validate_candidates(config: &ContestConfig) -> BallotResult<Vec<Item>> {
    let items: Vec<Item> = config
        .candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| Item {
            id: match c.id.clone() {
                Some(x) if !x.is_empty() => x,
                _ => format!("candidate-{}", idx),
            },
            name: c.name.clone(),
            group: match c.party.clone() {
                Some(x) if x.is_empty() => None,
                x => x,
            },
            rank: c.rank,
        })
        .collect();
    if items.iter().any(|i| i.name.is_empty()) {
        whatever!("all the candidates must have a name");
    }
    Ok(items)
}

pub fn read_contest(path: String) -> BallotResult<ContestConfig> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path: path.clone() })?;
    serde_json::from_str(&contents).context(ParsingJsonSnafu { path })
}

pub fn read_commands(path: String) -> BallotResult<Vec<Command>> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path: path.clone() })?;
    let commands: Vec<Command> =
        serde_json::from_str(&contents).context(ParsingJsonSnafu { path })?;
    debug!("read_commands: {} commands", commands.len());
    Ok(commands)
}

pub fn read_summary(path: String) -> BallotResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path: path.clone() })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}
