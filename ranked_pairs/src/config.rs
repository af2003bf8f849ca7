// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A registered candidate.
///
/// Candidates are identified inside an election by their position in the
/// registry (`0..n-1`). The name is only carried for display purposes, its
/// uniqueness is checked by the registry (see the builder), not by the
/// tabulation.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Candidate {
    pub name: String,
}

impl Candidate {
    pub fn new(name: &str) -> Candidate {
        Candidate {
            name: name.to_string(),
        }
    }
}

/// One voter's complete ranking.
///
/// `ranks[0]` is the index of the most preferred candidate. A ballot is only
/// accepted if it is a permutation of all the candidate indices.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Ballot {
    pub ranks: Vec<usize>,
}

impl Ballot {
    pub fn new(ranks: &[usize]) -> Ballot {
        Ballot {
            ranks: ranks.to_vec(),
        }
    }
}

// ******** Output data structures *********

/// A majority between two candidates, and what happened to it when locking.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PairStats {
    pub winner: String,
    pub loser: String,
    pub margin: u64,
    /// False if locking this pair would have created a cycle.
    pub locked: bool,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VotingResult {
    pub winner: String,
    pub winner_index: usize,
    pub num_ballots: u64,
    /// Candidate names, in registry order.
    pub candidates: Vec<String>,
    /// `preferences[i][j]` is the number of ballots ranking `i` above `j`.
    pub preferences: Vec<Vec<u64>>,
    /// All the pairs, in the order in which they were considered for locking.
    pub pairs: Vec<PairStats>,
}

/// The reason a ballot was rejected.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum BallotDefect {
    /// The ballot does not rank every candidate exactly once.
    WrongLength { expected: usize, found: usize },
    /// An index that does not refer to a registered candidate.
    UnknownCandidate(usize),
    /// The same candidate was ranked more than once.
    DuplicateCandidate(usize),
}

impl Display for BallotDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BallotDefect::WrongLength { expected, found } => {
                write!(f, "expected {} ranks, found {}", expected, found)
            }
            BallotDefect::UnknownCandidate(cid) => write!(f, "unknown candidate index {}", cid),
            BallotDefect::DuplicateCandidate(cid) => {
                write!(f, "candidate index {} ranked more than once", cid)
            }
        }
    }
}

/// Errors that prevent the algorithm from completing successfully.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum VotingErrors {
    /// No candidate was registered.
    EmptyElection,
    /// More candidates than the rules allow.
    CandidateLimitExceeded { count: usize, max: usize },
    /// The same name was registered twice.
    DuplicateCandidate(String),
    /// A ballot refers to a name that is not registered.
    UnknownCandidate { ballot: usize, name: String },
    /// The ballot at the given position (0-based, in submission order) is not
    /// a permutation of the candidates. The whole election is aborted.
    InvalidBallot { ballot: usize, defect: BallotDefect },
    /// Two tallies over different numbers of candidates cannot be merged.
    TallyMismatch { expected: usize, found: usize },
    /// The locked graph does not have exactly one source. `sources` holds the
    /// candidates without incoming edge.
    NoUniqueWinner { sources: Vec<usize> },
}

impl Error for VotingErrors {}

impl Display for VotingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingErrors::EmptyElection => write!(f, "no candidate registered"),
            VotingErrors::CandidateLimitExceeded { count, max } => write!(
                f,
                "{} candidates registered, the maximum is {}",
                count, max
            ),
            VotingErrors::DuplicateCandidate(name) => {
                write!(f, "candidate {:?} registered more than once", name)
            }
            VotingErrors::UnknownCandidate { ballot, name } => {
                write!(f, "ballot {}: unknown candidate {:?}", ballot, name)
            }
            VotingErrors::InvalidBallot { ballot, defect } => {
                write!(f, "ballot {} is invalid: {}", ballot, defect)
            }
            VotingErrors::TallyMismatch { expected, found } => write!(
                f,
                "cannot merge a tally over {} candidates into one over {}",
                found, expected
            ),
            VotingErrors::NoUniqueWinner { sources } => write!(
                f,
                "no unique winner: {} candidates without a locked defeat {:?}",
                sources.len(),
                sources
            ),
        }
    }
}

// ********* Configuration **********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VoteRules {
    /// The largest number of candidates accepted for one election.
    pub max_candidates: usize,
}

impl VoteRules {
    pub const DEFAULT_MAX_CANDIDATES: usize = 9;

    pub const DEFAULT_RULES: VoteRules = VoteRules {
        max_candidates: VoteRules::DEFAULT_MAX_CANDIDATES,
    };

    pub fn with_max_candidates(max_candidates: usize) -> VoteRules {
        VoteRules { max_candidates }
    }
}

impl Default for VoteRules {
    fn default() -> Self {
        VoteRules::DEFAULT_RULES
    }
}
