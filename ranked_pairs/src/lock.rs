use log::debug;

use crate::config::VotingErrors;
use crate::pairs::Pair;

/// The graph of accepted majorities. An edge `winner -> loser` means that the
/// majority of `winner` over `loser` is locked in.
///
/// Invariant: the graph is acyclic. Edges are only added through
/// [`LockedGraph::try_lock`], which refuses any edge closing a cycle.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LockedGraph {
    num_candidates: usize,
    // Row-major adjacency matrix.
    edges: Vec<bool>,
}

/// What happened to a pair during locking.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct LockDecision {
    pub pair: Pair,
    pub locked: bool,
}

impl LockedGraph {
    pub fn new(num_candidates: usize) -> LockedGraph {
        LockedGraph {
            num_candidates,
            edges: vec![false; num_candidates * num_candidates],
        }
    }

    pub fn num_candidates(&self) -> usize {
        self.num_candidates
    }

    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.edges[from * self.num_candidates + to]
    }

    /// The locked edges, in row-major order.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let n = self.num_candidates;
        (0..n)
            .flat_map(|from| (0..n).map(move |to| (from, to)))
            .filter(|&(from, to)| self.has_edge(from, to))
            .collect()
    }

    pub fn in_degree(&self, node: usize) -> usize {
        (0..self.num_candidates)
            .filter(|&from| self.has_edge(from, node))
            .count()
    }

    /// The candidates without any incoming edge, in increasing order.
    pub fn sources(&self) -> Vec<usize> {
        (0..self.num_candidates)
            .filter(|&c| self.in_degree(c) == 0)
            .collect()
    }

    /// True if there is a directed path (possibly empty) from `from` to `to`.
    pub fn can_reach(&self, from: usize, to: usize) -> bool {
        if from == to {
            return true;
        }
        let n = self.num_candidates;
        let mut visited = vec![false; n];
        let mut stack: Vec<usize> = vec![from];
        visited[from] = true;
        while let Some(node) = stack.pop() {
            for next in 0..n {
                if self.has_edge(node, next) && !visited[next] {
                    if next == to {
                        return true;
                    }
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }
        false
    }

    /// Adds the edge of the pair unless the loser already reaches the winner.
    /// Returns whether the edge was added.
    pub fn try_lock(&mut self, pair: &Pair) -> bool {
        if self.can_reach(pair.loser, pair.winner) {
            return false;
        }
        let idx = pair.winner * self.num_candidates + pair.loser;
        self.edges[idx] = true;
        true
    }

    /// Checks acyclicity by repeatedly removing nodes without incoming edges.
    pub fn is_acyclic(&self) -> bool {
        let n = self.num_candidates;
        let mut in_degrees: Vec<usize> = (0..n).map(|c| self.in_degree(c)).collect();
        let mut ready: Vec<usize> = (0..n).filter(|&c| in_degrees[c] == 0).collect();
        let mut removed = 0;
        while let Some(node) = ready.pop() {
            removed += 1;
            for next in 0..n {
                if self.has_edge(node, next) {
                    in_degrees[next] -= 1;
                    if in_degrees[next] == 0 {
                        ready.push(next);
                    }
                }
            }
        }
        removed == n
    }
}

/// Locks the pairs in the given order. Each pair is considered exactly once:
/// a pair rejected because it would close a cycle is not retried.
pub fn lock_pairs(
    num_candidates: usize,
    sorted_pairs: &[Pair],
) -> (LockedGraph, Vec<LockDecision>) {
    let mut graph = LockedGraph::new(num_candidates);
    let mut decisions: Vec<LockDecision> = Vec::with_capacity(sorted_pairs.len());
    for pair in sorted_pairs.iter() {
        let locked = graph.try_lock(pair);
        if locked {
            debug!("lock_pairs: locked {:?}", pair);
        } else {
            debug!("lock_pairs: skipped {:?}, it would create a cycle", pair);
        }
        debug_assert!(graph.is_acyclic());
        decisions.push(LockDecision {
            pair: *pair,
            locked,
        });
    }
    (graph, decisions)
}

/// The unique candidate with no locked defeat.
pub fn resolve_winner(graph: &LockedGraph) -> Result<usize, VotingErrors> {
    match graph.sources().as_slice() {
        [winner] => Ok(*winner),
        sources => Err(VotingErrors::NoUniqueWinner {
            sources: sources.to_vec(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(winner: usize, loser: usize, margin: u64) -> Pair {
        Pair {
            winner,
            loser,
            margin,
        }
    }

    #[test]
    fn reachability() {
        let mut g = LockedGraph::new(4);
        assert!(g.try_lock(&p(0, 1, 1)));
        assert!(g.try_lock(&p(1, 2, 1)));
        assert!(g.can_reach(0, 2));
        assert!(g.can_reach(3, 3));
        assert!(!g.can_reach(2, 0));
        assert!(!g.can_reach(0, 3));
        assert!(!g.can_reach(3, 0));
    }

    #[test]
    fn rejects_closing_edge() {
        let (g, decisions) = lock_pairs(3, &[p(0, 1, 1), p(1, 2, 1), p(2, 0, 1)]);
        let locked: Vec<bool> = decisions.iter().map(|d| d.locked).collect();
        assert_eq!(locked, vec![true, true, false]);
        assert_eq!(g.edges(), vec![(0, 1), (1, 2)]);
        assert_eq!(resolve_winner(&g), Ok(0));
    }

    #[test]
    fn disjoint_chains_can_be_joined() {
        // 1 -> 2 joins two chains without closing a cycle, 3 -> 0 closes one.
        let pairs = [p(0, 1, 5), p(2, 3, 5), p(1, 2, 3), p(3, 0, 1)];
        let mut g = LockedGraph::new(4);
        let mut locked = vec![];
        for pair in pairs.iter() {
            locked.push(g.try_lock(pair));
            assert!(g.is_acyclic());
        }
        assert_eq!(locked, vec![true, true, true, false]);
        assert_eq!(g.sources(), vec![0]);
        assert_eq!(g.in_degree(2), 1);
    }

    #[test]
    fn acyclic_after_every_insertion() {
        // Some candidates have majorities in both directions here.
        let mut pairs = vec![];
        for i in 0..5 {
            for j in 0..5 {
                if i != j && (i + 2 * j) % 3 == 0 {
                    pairs.push(p(i, j, 1));
                }
            }
        }
        let mut g = LockedGraph::new(5);
        for pair in pairs.iter() {
            g.try_lock(pair);
            assert!(g.is_acyclic(), "cycle after {:?}: {:?}", pair, g.edges());
        }
    }

    #[test]
    fn is_acyclic_detects_cycles() {
        let mut g = LockedGraph::new(3);
        g.edges = vec![false, true, false, false, false, true, true, false, false];
        assert!(!g.is_acyclic());
        assert!(LockedGraph::new(3).is_acyclic());
    }

    #[test]
    fn no_unique_winner() {
        let g = LockedGraph::new(3);
        assert_eq!(
            resolve_winner(&g),
            Err(VotingErrors::NoUniqueWinner {
                sources: vec![0, 1, 2]
            })
        );
        assert_eq!(resolve_winner(&LockedGraph::new(1)), Ok(0));
    }
}
