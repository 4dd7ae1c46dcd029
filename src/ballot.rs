use log::{debug, info, warn};

use ranked_selection::flags::{all_flags, rank_label};
use ranked_selection::*;
use snafu::{prelude::*, ErrorCompat, Snafu};

use std::fs;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::ballot::commands::*;
use crate::ballot::config_reader::*;

pub mod commands;
pub mod config_reader;

#[derive(Debug, Snafu)]
pub enum BallotError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON content of {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Invalid contest: {source}"))]
    InvalidContest { source: SelectionErrors },
    #[snafu(display("Command #{index} {command} failed: {source}"))]
    FailedCommand {
        source: SelectionErrors,
        index: usize,
        command: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type BallotResult<T> = Result<T, BallotError>;

fn mode_name(mode: MoveMode) -> &'static str {
    match mode {
        MoveMode::ByRank => "rank",
        MoveMode::ByPosition => "position",
    }
}

fn build_summary_js(config: &ContestConfig, session: &Session) -> JSValue {
    let engine = session.engine();
    let assignment = engine.assignment();
    let flags = all_flags(engine.items(), assignment, session.mode());
    let items: Vec<JSValue> = engine
        .items()
        .iter()
        .zip(flags.iter())
        .map(|(item, f)| {
            json!({
                "id": item.id,
                "name": item.name,
                "group": item.group,
                "rank": item.rank,
                "label": rank_label(item, assignment),
                "flags": {
                    "isRanked": f.is_ranked,
                    "isHighestRanked": f.is_highest_ranked,
                    "isLowestRanked": f.is_lowest_ranked,
                    "isFirstRankedPosition": f.is_first_ranked_position,
                    "isLastRankedPosition": f.is_last_ranked_position,
                    "tapDisabled": f.tap_disabled,
                    "upControlHidden": f.up_control_hidden,
                    "downControlHidden": f.down_control_hidden,
                }
            })
        })
        .collect();
    json!({
        "contest": config.contest_name,
        "maxRank": engine.max_rank(),
        "currentRank": engine.current_rank(),
        "contractMet": engine.contract_met(),
        "sorted": engine.is_sorted(),
        "mode": mode_name(session.mode()),
        "items": items,
    })
}

fn write_summary(pretty_js: &str, out: Option<String>) -> BallotResult<()> {
    match out.as_deref() {
        None | Some("stdout") | Some("") => {
            println!("{}", pretty_js);
        }
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, pretty_js).context(WritingJsonSnafu { path })?;
        }
    }
    Ok(())
}

/// Loads a contest, replays the commands on it and outputs the final ballot.
///
/// Arguments:
/// * `config_path` the contest description
/// * `commands_path` the session to replay. If not provided, the commands of the
/// contest description are used.
/// * `mode` overrides the initial move mode of the contest description.
/// * `out` where to write the summary (stdout by default)
/// * `check_summary_path` a reference summary to compare with
pub fn run_session(
    config_path: String,
    commands_path: Option<String>,
    mode: Option<String>,
    out: Option<String>,
    check_summary_path: Option<String>,
) -> BallotResult<()> {
    let config = read_contest(config_path)?;
    info!("config: {:?}", config);

    let rules = validate_rules(&config, mode.as_deref())?;
    let items = validate_candidates(&config)?;
    let engine = SelectionEngine::new(items, &rules).context(InvalidContestSnafu {})?;

    let commands: Vec<Command> = match commands_path {
        Some(p) => read_commands(p)?,
        None => config.commands.clone().unwrap_or_default(),
    };
    info!(
        "Replaying {} commands on {} candidates",
        commands.len(),
        engine.len()
    );

    let mut session = Session::new(engine, rules.move_mode);
    let mut applied: usize = 0;
    for (index, command) in commands.iter().enumerate() {
        let transition = session.apply(command).context(FailedCommandSnafu {
            index,
            command: format!("{:?}", command),
        })?;
        debug!("command #{} {:?}: {:?}", index, command, transition);
        if transition.is_applied() {
            applied += 1;
        }
    }
    info!("{} of {} commands applied", applied, commands.len());

    // Assemble the final json
    let result_js = build_summary_js(&config, &session);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(SerializingJsonSnafu {})?;
    write_summary(&pretty_js_stats, out)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(summary_p)?;
        if summary_ref != result_js {
            let pretty_js_summary_ref =
                serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between the final ballot and the reference summary")
        }
    }

    Ok(())
}

fn run_session_test(test_name: &str, config_lpath: &str, summary_lpath: &str) -> BallotResult<()> {
    let test_dir = option_env!("RANKBALLOT_TEST_DIR")
        .unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/tests"));
    info!("Running test {}", test_name);
    let commands_p = format!("{}/{}/{}_commands.json", test_dir, test_name, test_name);
    let commands = if std::path::Path::new(&commands_p).exists() {
        Some(commands_p)
    } else {
        None
    };
    let res = run_session(
        format!("{}/{}/{}", test_dir, test_name, config_lpath),
        commands,
        None,
        None,
        Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
    );
    if let Err(e) = &res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured {}", e);
        if let Some(bt) = ErrorCompat::backtrace(e) {
            eprintln!("trace: {}", bt);
        }
    }
    res
}

pub fn test_wrapper(test_name: &str) {
    let res = run_session_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    );
    assert!(res.is_ok(), "test {} failed: {:?}", test_name, res);
}

#[cfg(test)]
mod tests {

    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn fill_ballot_and_sort() {
        init();
        test_wrapper("fill_ballot_and_sort");
    }

    #[test]
    fn deselect_keeps_other_ranks() {
        init();
        test_wrapper("deselect_keeps_other_ranks");
    }

    #[test]
    fn move_by_position() {
        init();
        test_wrapper("move_by_position");
    }

    #[test]
    fn move_by_rank() {
        init();
        test_wrapper("move_by_rank");
    }

    #[test]
    fn drag_reorder() {
        init();
        test_wrapper("drag_reorder");
    }

    #[test]
    fn resume_ballot() {
        init();
        test_wrapper("resume_ballot");
    }

    #[test]
    fn uncontrolled_is_rejected() {
        init();
        let res = run_session_test(
            "uncontrolled_policy",
            "uncontrolled_policy_config.json",
            "missing_summary.json",
        );
        assert!(matches!(
            res,
            Err(BallotError::InvalidContest {
                source: SelectionErrors::UnsupportedPolicy(ControlPolicy::Uncontrolled)
            })
        ));
    }

    #[test]
    fn bad_command_is_reported() {
        init();
        let res = run_session_test(
            "bad_command",
            "bad_command_config.json",
            "missing_summary.json",
        );
        assert!(matches!(
            res,
            Err(BallotError::FailedCommand {
                source: SelectionErrors::PositionOutOfRange { position: 7, len: 3 },
                index: 1,
                ..
            })
        ));
    }

    #[test]
    fn wrong_reference_is_detected() {
        init();
        let res = run_session_test(
            "fill_ballot_and_sort",
            "fill_ballot_and_sort_config.json",
            "fill_ballot_and_sort_wrong_summary.json",
        );
        assert!(matches!(res, Err(BallotError::Whatever { .. })));
    }
}
