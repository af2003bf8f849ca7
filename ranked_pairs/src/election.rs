//! The stages of one election run.
//!
//! Each stage is its own type and every transition consumes the previous
//! stage: `Election` (collecting ballots) → `TalliedElection` →
//! `ExtractedElection` → `SortedElection` → `LockedElection` → `VotingResult`.

use log::{debug, info};

use crate::config::*;
use crate::lock::{lock_pairs, resolve_winner, LockDecision, LockedGraph};
use crate::pairs::{extract_pairs, sort_pairs, Pair};
use crate::tally::{BallotTally, PreferenceMatrix};

/// An election that is collecting ballots.
#[derive(Debug, Clone)]
pub struct Election {
    candidates: Vec<Candidate>,
    tally: BallotTally,
    // Number of ballots submitted, including a rejected one.
    submitted: usize,
    // Set by the first rejected ballot. The election cannot recover from it.
    failure: Option<VotingErrors>,
}

impl Election {
    /// Starts an election. The candidate count is checked against the rules
    /// before anything else happens.
    pub fn new(candidates: &[Candidate], rules: &VoteRules) -> Result<Election, VotingErrors> {
        if candidates.is_empty() {
            return Err(VotingErrors::EmptyElection);
        }
        if candidates.len() > rules.max_candidates {
            return Err(VotingErrors::CandidateLimitExceeded {
                count: candidates.len(),
                max: rules.max_candidates,
            });
        }
        Ok(Election {
            candidates: candidates.to_vec(),
            tally: BallotTally::new(candidates.len()),
            submitted: 0,
            failure: None,
        })
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Records a ballot.
    ///
    /// An invalid ballot aborts the election: this call and every later call
    /// to `record` or `close` return the error.
    pub fn record(&mut self, ballot: &Ballot) -> Result<(), VotingErrors> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let ballot_idx = self.submitted;
        self.submitted += 1;
        if let Err(defect) = self.tally.record(&ballot.ranks) {
            let err = VotingErrors::InvalidBallot {
                ballot: ballot_idx,
                defect,
            };
            self.failure = Some(err.clone());
            return Err(err);
        }
        Ok(())
    }

    /// Stops collecting ballots.
    pub fn close(self) -> Result<TalliedElection, VotingErrors> {
        if let Some(err) = self.failure {
            return Err(err);
        }
        let (matrix, num_ballots) = self.tally.finish();
        info!("Tallied {:?} ballots", num_ballots);
        Ok(TalliedElection {
            candidates: self.candidates,
            matrix,
            num_ballots,
        })
    }
}

#[derive(Debug, Clone)]
pub struct TalliedElection {
    candidates: Vec<Candidate>,
    matrix: PreferenceMatrix,
    num_ballots: u64,
}

impl TalliedElection {
    pub fn matrix(&self) -> &PreferenceMatrix {
        &self.matrix
    }

    pub fn num_ballots(&self) -> u64 {
        self.num_ballots
    }

    pub fn extract_pairs(self) -> ExtractedElection {
        let pairs = extract_pairs(&self.matrix);
        info!("Found {:?} majorities", pairs.len());
        ExtractedElection {
            tallied: self,
            pairs,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedElection {
    tallied: TalliedElection,
    pairs: Vec<Pair>,
}

impl ExtractedElection {
    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn sort(self) -> SortedElection {
        SortedElection {
            tallied: self.tallied,
            pairs: sort_pairs(self.pairs),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SortedElection {
    tallied: TalliedElection,
    pairs: Vec<Pair>,
}

impl SortedElection {
    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn lock(self) -> LockedElection {
        let (graph, decisions) = lock_pairs(self.tallied.candidates.len(), &self.pairs);
        info!(
            "Locked {:?} of {:?} majorities",
            decisions.iter().filter(|d| d.locked).count(),
            decisions.len()
        );
        LockedElection {
            tallied: self.tallied,
            graph,
            decisions,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LockedElection {
    tallied: TalliedElection,
    graph: LockedGraph,
    decisions: Vec<LockDecision>,
}

impl LockedElection {
    pub fn graph(&self) -> &LockedGraph {
        &self.graph
    }

    pub fn decisions(&self) -> &[LockDecision] {
        &self.decisions
    }

    pub fn resolve(self) -> Result<VotingResult, VotingErrors> {
        let winner_index = resolve_winner(&self.graph)?;
        let names: Vec<String> = self
            .tallied
            .candidates
            .iter()
            .map(|c| c.name.clone())
            .collect();
        debug!("resolve: locked edges: {:?}", self.graph.edges());
        let pairs: Vec<PairStats> = self
            .decisions
            .iter()
            .map(|d| PairStats {
                winner: names[d.pair.winner].clone(),
                loser: names[d.pair.loser].clone(),
                margin: d.pair.margin,
                locked: d.locked,
            })
            .collect();
        info!("Winner: {}: {}", winner_index, names[winner_index]);
        Ok(VotingResult {
            winner: names[winner_index].clone(),
            winner_index,
            num_ballots: self.tallied.num_ballots,
            preferences: self.tallied.matrix.to_rows(),
            candidates: names,
            pairs,
        })
    }
}
