pub mod aggregation;
pub mod enumerator;

// Common algorithm traits
use crate::models::{CandidateSet, CombinationResult};

/// Trait for wave combination solvers
pub trait CombinationSolver {
    /// Score every non-empty subset of the candidates.
    /// Results come by increasing subset size, then lexicographic by position.
    fn enumerate(&self, candidates: &CandidateSet) -> Vec<CombinationResult>;

    /// Score one subset given by ascending candidate positions.
    /// Returns `None` for an empty or out-of-range subset.
    fn score_subset(&self, candidates: &CandidateSet, members: &[usize])
        -> Option<CombinationResult>;
}
