use std::collections::HashMap;

pub use crate::config::*;

/// A builder for adding votes by candidate name.
///
/// The builder acts as the candidate registry: it checks that names are
/// unique and translates the names on each ballot into candidate indices.
///
/// ```
/// pub use ranked_pairs::builder::Builder;
/// pub use ranked_pairs::VoteRules;
/// # use ranked_pairs::VotingErrors;
///
/// let mut builder = Builder::new(&VoteRules::DEFAULT_RULES)?
///     .candidates(&["Anna".to_string(), "Bob".to_string()])?;
///
/// builder.add_vote_simple(&["Anna".to_string(), "Bob".to_string()])?;
/// builder.add_vote_simple(&["Anna".to_string(), "Bob".to_string()])?;
/// builder.add_vote_simple(&["Bob".to_string(), "Anna".to_string()])?;
///
/// assert_eq!(builder.run()?.winner, "Anna");
///
/// # Ok::<(), VotingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: VoteRules,
    pub(crate) _candidates: Vec<Candidate>,
    pub(crate) _index: HashMap<String, usize>,
    pub(crate) _votes: Vec<Ballot>,
}

impl Builder {
    pub fn new(rules: &VoteRules) -> Result<Builder, VotingErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _candidates: Vec::new(),
            _index: HashMap::new(),
            _votes: Vec::new(),
        })
    }

    /// Registers the candidates. Their order defines their indices.
    ///
    /// The candidate count is checked against the rules here, before any
    /// vote can be added.
    pub fn candidates(self, cands: &[String]) -> Result<Builder, VotingErrors> {
        if cands.is_empty() {
            return Err(VotingErrors::EmptyElection);
        }
        if cands.len() > self._rules.max_candidates {
            return Err(VotingErrors::CandidateLimitExceeded {
                count: cands.len(),
                max: self._rules.max_candidates,
            });
        }
        let mut index: HashMap<String, usize> = HashMap::new();
        for (idx, name) in cands.iter().enumerate() {
            if index.insert(name.clone(), idx).is_some() {
                return Err(VotingErrors::DuplicateCandidate(name.clone()));
            }
        }
        Ok(Builder {
            _rules: self._rules,
            _candidates: cands.iter().map(|name| Candidate::new(name)).collect(),
            _index: index,
            _votes: Vec::new(),
        })
    }

    /// Adds a vote, given as the names of the candidates from the most
    /// preferred to the least preferred.
    ///
    /// Unknown names are rejected here. Missing or repeated names are
    /// rejected when the election is run.
    pub fn add_vote_simple(&mut self, candidates: &[String]) -> Result<(), VotingErrors> {
        let mut ranks: Vec<usize> = Vec::with_capacity(candidates.len());
        for name in candidates {
            match self._index.get(name) {
                Some(cid) => ranks.push(*cid),
                None => {
                    return Err(VotingErrors::UnknownCandidate {
                        ballot: self._votes.len(),
                        name: name.clone(),
                    });
                }
            }
        }
        self.add_vote(&Ballot { ranks })
    }

    /// Adds a vote expressed with candidate indices.
    pub fn add_vote(&mut self, vote: &Ballot) -> Result<(), VotingErrors> {
        self._votes.push(vote.clone());
        Ok(())
    }

    pub fn num_votes(&self) -> usize {
        self._votes.len()
    }

    pub fn run(&self) -> Result<VotingResult, VotingErrors> {
        crate::run_ranked_pairs(&self._votes, &self._rules, &self._candidates)
    }
}
