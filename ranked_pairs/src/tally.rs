use log::debug;

use std::ops::{Add, AddAssign};

use crate::config::{BallotDefect, VotingErrors};

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash, Default)]
pub(crate) struct VoteCount(pub(crate) u64);

impl VoteCount {
    pub(crate) const EMPTY: VoteCount = VoteCount(0);
}

impl AddAssign for VoteCount {
    fn add_assign(&mut self, rhs: VoteCount) {
        self.0 += rhs.0;
    }
}

impl Add for VoteCount {
    type Output = VoteCount;
    fn add(self: VoteCount, rhs: VoteCount) -> VoteCount {
        VoteCount(self.0 + rhs.0)
    }
}

/// Head-to-head preference counts.
///
/// `get(i, j)` is the number of ballots that rank candidate `i` strictly above
/// candidate `j`. The diagonal is never written.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PreferenceMatrix {
    num_candidates: usize,
    // Row-major, num_candidates * num_candidates cells.
    cells: Vec<VoteCount>,
}

impl PreferenceMatrix {
    pub(crate) fn new(num_candidates: usize) -> PreferenceMatrix {
        PreferenceMatrix {
            num_candidates,
            cells: vec![VoteCount::EMPTY; num_candidates * num_candidates],
        }
    }

    pub fn num_candidates(&self) -> usize {
        self.num_candidates
    }

    pub fn get(&self, winner: usize, loser: usize) -> u64 {
        self.cells[self.offset(winner, loser)].0
    }

    /// The matrix as nested rows, for reporting.
    pub fn to_rows(&self) -> Vec<Vec<u64>> {
        (0..self.num_candidates)
            .map(|i| (0..self.num_candidates).map(|j| self.get(i, j)).collect())
            .collect()
    }

    fn offset(&self, winner: usize, loser: usize) -> usize {
        winner * self.num_candidates + loser
    }

    fn increment(&mut self, winner: usize, loser: usize) {
        let idx = self.offset(winner, loser);
        self.cells[idx] += VoteCount(1);
    }
}

/// Checks that `ranks` is a permutation of `0..num_candidates`.
pub fn validate_ballot(num_candidates: usize, ranks: &[usize]) -> Result<(), BallotDefect> {
    if ranks.len() != num_candidates {
        return Err(BallotDefect::WrongLength {
            expected: num_candidates,
            found: ranks.len(),
        });
    }
    let mut seen = vec![false; num_candidates];
    for &cid in ranks.iter() {
        match seen.get_mut(cid) {
            None => return Err(BallotDefect::UnknownCandidate(cid)),
            Some(true) => return Err(BallotDefect::DuplicateCandidate(cid)),
            Some(s) => *s = true,
        }
    }
    Ok(())
}

/// Accumulates ballots into a preference matrix.
///
/// Tallies over the same candidates can be built independently (for example
/// one per batch of ballots) and summed with [`BallotTally::merge`].
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct BallotTally {
    matrix: PreferenceMatrix,
    num_ballots: VoteCount,
}

impl BallotTally {
    pub fn new(num_candidates: usize) -> BallotTally {
        BallotTally {
            matrix: PreferenceMatrix::new(num_candidates),
            num_ballots: VoteCount::EMPTY,
        }
    }

    pub fn num_candidates(&self) -> usize {
        self.matrix.num_candidates
    }

    pub fn num_ballots(&self) -> u64 {
        self.num_ballots.0
    }

    pub fn matrix(&self) -> &PreferenceMatrix {
        &self.matrix
    }

    /// Records one ballot. The tally is left untouched if the ballot is not a
    /// permutation of the candidates.
    pub fn record(&mut self, ranks: &[usize]) -> Result<(), BallotDefect> {
        let n = self.num_candidates();
        validate_ballot(n, ranks)?;
        // position[c] is the rank of candidate c on this ballot.
        let mut position = vec![0usize; n];
        for (rank, &cid) in ranks.iter().enumerate() {
            position[cid] = rank;
        }
        for i in 0..n {
            for j in 0..n {
                if i != j && position[i] < position[j] {
                    self.matrix.increment(i, j);
                }
            }
        }
        self.num_ballots += VoteCount(1);
        Ok(())
    }

    /// Adds the counts of another tally over the same candidates.
    ///
    /// Fails with `VotingErrors::TallyMismatch` if the two tallies do not
    /// have the same number of candidates. `self` is then left untouched.
    pub fn merge(&mut self, other: &BallotTally) -> Result<(), VotingErrors> {
        if self.num_candidates() != other.num_candidates() {
            return Err(VotingErrors::TallyMismatch {
                expected: self.num_candidates(),
                found: other.num_candidates(),
            });
        }
        for (cell, other_cell) in self.matrix.cells.iter_mut().zip(other.matrix.cells.iter()) {
            *cell += *other_cell;
        }
        self.num_ballots += other.num_ballots;
        debug!(
            "merge: merged {:?} ballots, total {:?}",
            other.num_ballots.0, self.num_ballots.0
        );
        Ok(())
    }

    pub fn finish(self) -> (PreferenceMatrix, u64) {
        (self.matrix, self.num_ballots.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally_of(n: usize, ballots: &[&[usize]]) -> BallotTally {
        let mut t = BallotTally::new(n);
        for b in ballots {
            t.record(b).unwrap();
        }
        t
    }

    fn check_matrix_invariant(t: &BallotTally) {
        let m = t.matrix();
        for i in 0..m.num_candidates() {
            assert_eq!(m.get(i, i), 0);
            for j in 0..m.num_candidates() {
                if i != j {
                    assert_eq!(m.get(i, j) + m.get(j, i), t.num_ballots());
                }
            }
        }
    }

    #[test]
    fn record_two_candidates() {
        let t = tally_of(2, &[&[0, 1], &[0, 1], &[0, 1], &[1, 0], &[1, 0]]);
        assert_eq!(t.matrix().get(0, 1), 3);
        assert_eq!(t.matrix().get(1, 0), 2);
        assert_eq!(t.num_ballots(), 5);
    }

    #[test]
    fn matrix_invariant_holds_after_each_ballot() {
        let ballots: Vec<Vec<usize>> = vec![
            vec![0, 1, 2, 3],
            vec![3, 2, 1, 0],
            vec![1, 3, 0, 2],
            vec![2, 0, 3, 1],
            vec![1, 0, 2, 3],
        ];
        let mut t = BallotTally::new(4);
        for b in ballots.iter() {
            t.record(b).unwrap();
            check_matrix_invariant(&t);
        }
        assert_eq!(t.matrix().get(1, 3), 3);
        assert_eq!(t.matrix().get(3, 1), 2);
    }

    #[test]
    fn invalid_ballots() {
        assert_eq!(
            validate_ballot(3, &[0, 1]),
            Err(BallotDefect::WrongLength {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            validate_ballot(3, &[0, 1, 3]),
            Err(BallotDefect::UnknownCandidate(3))
        );
        assert_eq!(
            validate_ballot(3, &[2, 1, 2]),
            Err(BallotDefect::DuplicateCandidate(2))
        );
        assert_eq!(validate_ballot(3, &[2, 0, 1]), Ok(()));
        assert_eq!(validate_ballot(0, &[]), Ok(()));
    }

    #[test]
    fn rejected_ballot_leaves_tally_untouched() {
        let mut t = tally_of(3, &[&[0, 1, 2]]);
        let before = t.clone();
        assert!(t.record(&[0, 0, 1]).is_err());
        assert_eq!(t, before);
    }

    #[test]
    fn merged_partitions_equal_sequential_tally() {
        let ballots: Vec<Vec<usize>> = vec![
            vec![0, 1, 2],
            vec![1, 2, 0],
            vec![2, 0, 1],
            vec![0, 2, 1],
            vec![1, 0, 2],
            vec![0, 1, 2],
            vec![2, 1, 0],
        ];
        let mut sequential = BallotTally::new(3);
        for b in ballots.iter() {
            sequential.record(b).unwrap();
        }

        let mut merged = BallotTally::new(3);
        for chunk in ballots.chunks(3) {
            let mut partial = BallotTally::new(3);
            for b in chunk {
                partial.record(b).unwrap();
            }
            merged.merge(&partial).unwrap();
        }
        assert_eq!(merged, sequential);
        check_matrix_invariant(&merged);
    }

    #[test]
    fn merge_different_sizes() {
        let mut t = tally_of(3, &[&[2, 0, 1]]);
        let before = t.clone();
        assert_eq!(
            t.merge(&tally_of(2, &[&[1, 0]])),
            Err(VotingErrors::TallyMismatch {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(t, before);
    }
}
