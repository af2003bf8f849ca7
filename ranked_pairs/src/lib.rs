mod config;
pub mod builder;
pub mod election;
pub mod lock;
pub mod manual;
pub mod pairs;
pub mod tally;

use log::{debug, info};

pub use crate::config::*;
use crate::election::Election;

/// Runs the ranked pairs algorithm for the given ballots.
///
/// Arguments:
/// * `coll` the ballots, each a complete ranking of candidate indices
/// * `rules` the rules that govern this election
/// * `candidates` the registered candidates for this election. The index of a
/// candidate in this list is the index used in the ballots.
///
/// The first ballot that is not a permutation of the candidates aborts the
/// election with `VotingErrors::InvalidBallot`.
pub fn run_ranked_pairs(
    coll: &[Ballot],
    rules: &VoteRules,
    candidates: &[Candidate],
) -> Result<VotingResult, VotingErrors> {
    info!(
        "Processing {:?} ballots, candidates: {:?}, rules: {:?}",
        coll.len(),
        candidates,
        rules
    );
    for (idx, c) in candidates.iter().enumerate() {
        debug!("Candidate: {}: {}", idx, c.name);
    }

    let mut election = Election::new(candidates, rules)?;
    for ballot in coll.iter() {
        election.record(ballot)?;
    }
    election.close()?.extract_pairs().sort().lock().resolve()
}
