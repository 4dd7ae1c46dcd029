use clap::Parser;

/// Replays a ranked-choice ballot session and prints the resulting ballot.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The contest description in JSON: candidates, number of ranks and
    /// control settings. See the manual of the ranked_selection crate for the format.
    #[clap(short, long, value_parser)]
    pub config: String,

    /// (file path, optional) The session to replay, as a JSON array of commands. If not
    /// provided, the commands embedded in the contest description are used.
    #[clap(long, value_parser)]
    pub commands: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the ballot will be written in JSON
    /// format to the given location. Otherwise it is printed to the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the expected summary in JSON format. If provided,
    /// rankballot will check that the final ballot matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// ('rank' or 'position') The initial mode of the up/down controls. Overrides the
    /// moveType of the contest description.
    #[clap(long, value_parser)]
    pub mode: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
