use log::debug;

use std::cmp::Ordering;

use crate::tally::PreferenceMatrix;

/// A strict head-to-head majority of `winner` over `loser`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct Pair {
    pub winner: usize,
    pub loser: usize,
    /// `matrix[winner][loser] - matrix[loser][winner]`, always > 0.
    pub margin: u64,
}

/// All the strict majorities of the matrix, in row-major order.
///
/// Tied candidates do not produce a pair.
pub fn extract_pairs(matrix: &PreferenceMatrix) -> Vec<Pair> {
    let n = matrix.num_candidates();
    let mut pairs: Vec<Pair> = Vec::new();
    for i in 0..n {
        for j in 0..n {
            let (for_i, for_j) = (matrix.get(i, j), matrix.get(j, i));
            if i != j && for_i > for_j {
                pairs.push(Pair {
                    winner: i,
                    loser: j,
                    margin: for_i - for_j,
                });
            }
        }
    }
    debug!("extract_pairs: {:?} pairs: {:?}", pairs.len(), pairs);
    pairs
}

/// The locking order: larger margins first, then the lower winner index,
/// then the lower loser index.
pub fn rank_order(a: &Pair, b: &Pair) -> Ordering {
    b.margin
        .cmp(&a.margin)
        .then(a.winner.cmp(&b.winner))
        .then(a.loser.cmp(&b.loser))
}

pub fn sort_pairs(mut pairs: Vec<Pair>) -> Vec<Pair> {
    pairs.sort_by(rank_order);
    debug!("sort_pairs: {:?}", pairs);
    pairs
}
