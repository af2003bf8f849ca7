use clap::Parser;

/// This is a ranked pairs (Tideman) tabulation program.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// The names of the candidates, in order. Ignored if --config is provided.
    #[clap(value_parser)]
    pub candidates: Vec<String>,

    /// (file path, optional) The file containing the election description in JSON.
    /// For more information about the file format, read the documentation of the
    /// `ranked_pairs::manual` module.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing the outcome of an election in JSON format. If provided, tideman will
    /// check that the tabulated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the election will be written in JSON format to the given
    /// location. Setting this option overrides the output directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The file containing the ballots. If not provided, the ballots are
    /// typed in interactively.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input. Only csv is currently supported.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default 9) The largest number of candidates accepted.
    #[clap(long, value_parser)]
    pub max_candidates: Option<usize>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
