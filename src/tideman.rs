mod config_reader;
mod io_common;
mod io_csv;
mod io_prompt;

use log::{debug, info, warn};

use ranked_pairs::builder::Builder;
use ranked_pairs::*;
use snafu::{prelude::*, Snafu};

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::tideman::config_reader::*;

#[derive(Debug, Snafu)]
pub enum TidemanError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON content"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Expected a positive number in the configuration"))]
    ParsingJsonNumber {},
    #[snafu(display("Cannot find the directory of the configuration file"))]
    MissingParentDir {},
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing CSV line"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Line {lineno} is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("Error reading the ballots"))]
    ReadingBallots { source: std::io::Error },
    #[snafu(display("The input ended before all the ballots were entered"))]
    MissingInput {},
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Usage: tideman [candidate ...]"))]
    Usage {},
    #[snafu(display("Maximum number of candidates is {max}"))]
    TooManyCandidates { max: usize },
    #[snafu(display("Invalid vote: {source}"))]
    InvalidVote { source: VotingErrors },
    #[snafu(display("Voting error: {source}"))]
    Voting { source: VotingErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

impl TidemanError {
    /// The exit status of the program for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            TidemanError::Usage {} => 1,
            TidemanError::TooManyCandidates { .. } => 2,
            TidemanError::InvalidVote { .. } => 3,
            _ => 4,
        }
    }
}

pub type TidemanResult<T> = Result<T, TidemanError>;

/// A ballot, as read from the input. The choices are candidate names.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedBallot {
    pub id: Option<String>,
    pub choices: Vec<String>,
}

fn result_stats_to_json(rs: &VotingResult) -> JSValue {
    let mut tally: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
    for (i, name) in rs.candidates.iter().enumerate() {
        let row: BTreeMap<String, u64> = rs
            .candidates
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(j, other)| (other.clone(), rs.preferences[i][j]))
            .collect();
        tally.insert(name.clone(), row);
    }

    let pairs: Vec<JSValue> = rs
        .pairs
        .iter()
        .map(|p| {
            json!({
                "winner": p.winner,
                "loser": p.loser,
                "margin": p.margin,
                "locked": p.locked
            })
        })
        .collect();

    json!({
        "winner": rs.winner,
        "ballots": rs.num_ballots,
        "tally": tally,
        "pairs": pairs
    })
}

fn build_summary_js(settings: Option<&OutputSettings>, rv: &VotingResult) -> JSValue {
    let c = match settings {
        Some(s) => OutputConfig {
            contest: s.contest_name.clone(),
            date: s.contest_date.clone(),
            jurisdiction: s.contest_juridiction.clone(),
            office: s.contest_office.clone(),
        },
        None => OutputConfig {
            contest: "Election".to_string(),
            date: None,
            jurisdiction: None,
            office: None,
        },
    };
    json!({
        "config": c,
        "results": result_stats_to_json(rv) })
}

/// Translates the names on the ballots into a ranked pairs election and runs it.
///
/// Names that are not registered candidates and ballots that do not rank
/// every candidate exactly once abort the election.
fn validate_ballots(
    parsed_ballots: &[ParsedBallot],
    candidates: &[String],
    rules: &VoteRules,
) -> TidemanResult<VotingResult> {
    let mut builder = Builder::new(rules)
        .and_then(|b| b.candidates(candidates))
        .map_err(|e| match e {
            VotingErrors::CandidateLimitExceeded { max, .. } => {
                TidemanError::TooManyCandidates { max }
            }
            e => TidemanError::Voting { source: e },
        })?;

    for pb in parsed_ballots.iter() {
        debug!("Choices for ballot {:?}: {:?}", pb.id, pb.choices);
        builder.add_vote_simple(&pb.choices).context(InvalidVoteSnafu {})?;
    }

    match builder.run() {
        Ok(x) => Ok(x),
        Err(VotingErrors::InvalidBallot { ballot, defect }) => {
            warn!(
                "Invalid ballot {:?}: {}",
                parsed_ballots.get(ballot).and_then(|pb| pb.id.clone()),
                defect
            );
            Err(TidemanError::InvalidVote {
                source: VotingErrors::InvalidBallot { ballot, defect },
            })
        }
        Err(e) => Err(TidemanError::Voting { source: e }),
    }
}

fn rules_with_override(configured: Option<usize>, max_override: Option<usize>) -> VoteRules {
    match max_override.or(configured) {
        Some(m) => VoteRules::with_max_candidates(m),
        None => VoteRules::DEFAULT_RULES,
    }
}

fn read_ranking_data(root_path: &Path, cfs: &FileSource) -> TidemanResult<Vec<ParsedBallot>> {
    let p: PathBuf = root_path.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read rank file {:?}", p2);
    match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_ranking(p2, cfs),
        x => whatever!("Provider not implemented {:?}", x),
    }
}

fn write_summary(out: &str, pretty_js: &str) -> TidemanResult<()> {
    if out == "stdout" {
        println!("{}", pretty_js);
        Ok(())
    } else {
        info!("Writing summary to {:?}", out);
        fs::write(out, pretty_js).context(WritingSummarySnafu {
            path: out.to_string(),
        })
    }
}

/// Presents the result: the winner, the optional summary file and the check
/// against the reference summary.
fn report(
    settings: Option<&OutputSettings>,
    result: &VotingResult,
    out_path: Option<String>,
    check_summary_path: Option<String>,
) -> TidemanResult<()> {
    println!("Winner: {}", result.winner);

    let result_js = build_summary_js(settings, result);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    debug!("stats:{}", pretty_js_stats);

    if let Some(out) = out_path {
        write_summary(&out, &pretty_js_stats)?;
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(summary_p)?;
        info!("summary: {:?}", summary_ref);
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }
    Ok(())
}

/// Runs the election described by a JSON configuration file.
pub fn run_election(
    config_path: String,
    check_summary_path: Option<String>,
    out_path: Option<String>,
    max_candidates: Option<usize>,
) -> TidemanResult<VotingResult> {
    let config_p = Path::new(config_path.as_str());
    let config_str = fs::read_to_string(config_path.clone()).context(OpeningJsonSnafu {
        path: config_path.clone(),
    })?;
    let config: ElectionConfig = serde_json::from_str(&config_str).context(ParsingJsonSnafu {})?;
    info!("config: {:?}", config);

    if config.cvr_file_sources.is_empty() {
        whatever!("No file sources detected in {}", config_path);
    }

    let rules = rules_with_override(config.rules.max_candidates, max_candidates);
    let root_p = config_p.parent().context(MissingParentDirSnafu {})?;
    let mut data: Vec<ParsedBallot> = Vec::new();
    for cfs in config.cvr_file_sources.iter() {
        let mut file_data = read_ranking_data(root_p, cfs)?;
        data.append(&mut file_data);
    }
    info!("Read {:?} ballots", data.len());

    let candidates: Vec<String> = config.candidates.iter().map(|c| c.name.clone()).collect();
    let result = validate_ballots(&data, &candidates, &rules)?;
    info!("res {:?}", result);

    // An explicit output path takes precedence over the configured directory.
    let out = out_path.or_else(|| {
        config
            .output_settings
            .output_directory
            .as_ref()
            .map(|d| root_p.join(d).join("summary.json").display().to_string())
    });
    report(
        Some(&config.output_settings),
        &result,
        out,
        check_summary_path,
    )?;
    Ok(result)
}

/// Runs an election with the candidates given on the command line. The
/// ballots come from a file or are typed in.
pub fn run_command_line(args: &Args) -> TidemanResult<VotingResult> {
    if args.candidates.is_empty() {
        return Err(TidemanError::Usage {});
    }
    let rules = rules_with_override(None, args.max_candidates);
    // Reject the candidates before asking for any ballot.
    if args.candidates.len() > rules.max_candidates {
        return Err(TidemanError::TooManyCandidates {
            max: rules.max_candidates,
        });
    }

    let ballots: Vec<ParsedBallot> = match (&args.input, args.input_type.as_deref()) {
        (Some(path), None | Some("csv")) => {
            io_csv::read_csv_ranking(path.clone(), &FileSource::csv(path))?
        }
        (Some(_), Some(x)) => whatever!("Input type not implemented {:?}", x),
        (None, _) => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut output = io::stdout();
            let ballots = io_prompt::read_prompt_ballots(&mut input, &mut output, &args.candidates)?;
            output.flush().context(ReadingBallotsSnafu {})?;
            ballots
        }
    };

    let result = validate_ballots(&ballots, &args.candidates, &rules)?;
    report(None, &result, args.out.clone(), args.reference.clone())?;
    Ok(result)
}

pub fn run_cli(args: &Args) -> TidemanResult<()> {
    match &args.config {
        Some(config_path) => run_election(
            config_path.clone(),
            args.reference.clone(),
            args.out.clone(),
            args.max_candidates,
        )
        .map(|_| ()),
        None => run_command_line(args).map(|_| ()),
    }
}

#[cfg(test)]
fn test_dir() -> String {
    format!("{}/tests/data", env!("CARGO_MANIFEST_DIR"))
}

#[cfg(test)]
fn run_election_test(
    test_name: &str,
    config_lpath: &str,
    summary_lpath: &str,
) -> TidemanResult<VotingResult> {
    let _ = env_logger::builder().is_test(true).try_init();
    let test_dir = test_dir();
    info!("Running test {}", test_name);
    run_election(
        format!("{}/{}/{}", test_dir, test_name, config_lpath),
        Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
        None,
        None,
    )
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str) -> VotingResult {
    let res = run_election_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    );
    match res {
        Ok(x) => x,
        Err(e) => panic!("Error occured in test {}: {} ({:?})", test_name, e, e),
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn clear_majority() {
        let res = test_wrapper("clear_majority");
        assert_eq!(res.winner, "Alice");
    }

    #[test]
    fn condorcet_cycle_multi_file() {
        let res = test_wrapper("condorcet_cycle_multi_file");
        assert_eq!(res.winner, "A");
        assert_eq!(res.num_ballots, 3);
    }

    #[test]
    fn five_candidates() {
        test_wrapper("five_candidates");
    }

    #[test]
    fn invalid_ballot() {
        let res = run_election_test(
            "invalid_ballot",
            "invalid_ballot_config.json",
            "missing_summary.json",
        );
        match res {
            Err(TidemanError::InvalidVote {
                source: VotingErrors::InvalidBallot { ballot, .. },
            }) => assert_eq!(ballot, 2),
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn unknown_candidate() {
        let res = run_election_test(
            "unknown_candidate",
            "unknown_candidate_config.json",
            "missing_summary.json",
        );
        match res {
            Err(e @ TidemanError::InvalidVote { .. }) => assert_eq!(e.exit_code(), 3),
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn max_candidates_override() {
        let test_dir = test_dir();
        let res = run_election(
            format!("{}/five_candidates/five_candidates_config.json", test_dir),
            None,
            None,
            Some(4),
        );
        match res {
            Err(e @ TidemanError::TooManyCandidates { max: 4 }) => assert_eq!(e.exit_code(), 2),
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn reference_mismatch_is_an_error() {
        let test_dir = test_dir();
        let res = run_election(
            format!("{}/clear_majority/clear_majority_config.json", test_dir),
            Some(format!(
                "{}/condorcet_cycle_multi_file/condorcet_cycle_multi_file_expected_summary.json",
                test_dir
            )),
            None,
            None,
        );
        assert!(matches!(res, Err(TidemanError::Whatever { .. })));
    }

    #[test]
    fn command_line_arguments() {
        let args = Args {
            candidates: vec![],
            config: None,
            reference: None,
            out: None,
            input: None,
            input_type: None,
            max_candidates: None,
            verbose: false,
        };
        assert_eq!(run_command_line(&args).unwrap_err().exit_code(), 1);

        let too_many = Args {
            candidates: (0..10).map(|i| format!("C{}", i)).collect(),
            ..args.clone()
        };
        assert_eq!(run_command_line(&too_many).unwrap_err().exit_code(), 2);

        let from_csv = Args {
            candidates: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            input: Some(format!(
                "{}/condorcet_cycle_multi_file/cycle_part1.csv",
                test_dir()
            )),
            ..args
        };
        // [A, B, C] and [B, C, A]: only B > C is a majority, A and B are
        // both undefeated.
        match run_command_line(&from_csv) {
            Err(TidemanError::Voting {
                source: VotingErrors::NoUniqueWinner { sources },
            }) => assert_eq!(sources, vec![0, 1]),
            x => panic!("unexpected result {:?}", x),
        }
    }
}
