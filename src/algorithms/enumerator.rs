use rayon::prelude::*;
use tracing::{debug, info};

use crate::algorithms::CombinationSolver;
use crate::error::PlanError;
use crate::models::{CandidateSet, CombinationResult, ItemCount};
use crate::utils::statistics::{mean, percentile, round_half_even};
use crate::utils::subsets::{non_empty_subset_count, IndexCombinations};

/// Which optional metrics are computed per subset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringMetrics {
    /// 25th percentile of the per-zone sums
    pub lower_quartile: bool,
}

impl Default for ScoringMetrics {
    fn default() -> Self {
        Self {
            lower_quartile: true,
        }
    }
}

/// Exhaustive subset enumerator.
///
/// Every subset is scored independently from its member rows, so the
/// parallel and sequential paths produce the same rows in the same order.
#[derive(Debug, Clone, Default)]
pub struct WaveEnumerator {
    metrics: ScoringMetrics,
    parallel: bool,
}

impl WaveEnumerator {
    pub fn new(metrics: ScoringMetrics, parallel: bool) -> Self {
        Self { metrics, parallel }
    }

    pub fn metrics(&self) -> ScoringMetrics {
        self.metrics
    }

    /// Scores subsets one size at a time on the current thread
    pub fn enumerate_sequential(&self, candidates: &CandidateSet) -> Vec<CombinationResult> {
        let mut results = Vec::with_capacity(expected_rows(candidates.len()));

        for size in 1..=candidates.len() {
            let before = results.len();
            results.extend(
                IndexCombinations::new(candidates.len(), size)
                    .filter_map(|members| self.score_subset(candidates, &members)),
            );
            debug!("Scored {} subsets of size {}", results.len() - before, size);
        }

        results
    }

    /// Scores each subset size in parallel; rayon keeps the collected order
    pub fn enumerate_parallel(&self, candidates: &CandidateSet) -> Vec<CombinationResult> {
        let mut results = Vec::with_capacity(expected_rows(candidates.len()));

        for size in 1..=candidates.len() {
            let subsets: Vec<Vec<usize>> = IndexCombinations::new(candidates.len(), size).collect();
            let scored: Vec<CombinationResult> = subsets
                .par_iter()
                .filter_map(|members| self.score_subset(candidates, members))
                .collect();
            debug!("Scored {} subsets of size {}", scored.len(), size);
            results.extend(scored);
        }

        results
    }
}

impl CombinationSolver for WaveEnumerator {
    fn enumerate(&self, candidates: &CandidateSet) -> Vec<CombinationResult> {
        info!(
            "Enumerating {} candidates over {} zones ({} subsets)",
            candidates.len(),
            candidates.zone_count(),
            expected_rows(candidates.len())
        );

        if self.parallel {
            self.enumerate_parallel(candidates)
        } else {
            self.enumerate_sequential(candidates)
        }
    }

    fn score_subset(
        &self,
        candidates: &CandidateSet,
        members: &[usize],
    ) -> Option<CombinationResult> {
        let earliest_deadline = members
            .iter()
            .map(|&position| candidates.key(position).map(|key| key.dispatch_deadline))
            .collect::<Option<Vec<_>>>()?
            .into_iter()
            .min()?;

        let route_ids = members
            .iter()
            .filter_map(|&position| candidates.key(position).map(|key| key.route_id))
            .collect();

        let zone_totals = candidates.zone_totals(members);
        let total_items: ItemCount = zone_totals.iter().sum();
        let zone_values: Vec<f64> = zone_totals.iter().map(|&items| items as f64).collect();

        // No zone columns, no average
        let avg_per_zone = round_half_even(mean(&zone_values)?, 1);
        let lower_quartile = if self.metrics.lower_quartile {
            percentile(&zone_values, 25.0).map(|value| round_half_even(value, 1))
        } else {
            None
        };

        Some(CombinationResult {
            members: members.to_vec(),
            route_ids,
            total_items,
            avg_per_zone,
            lower_quartile,
            earliest_deadline,
        })
    }
}

/// Refuses candidate sets above the configured ceiling
pub fn check_candidate_limit(count: usize, limit: usize) -> Result<(), PlanError> {
    if count > limit {
        return Err(PlanError::CandidateSetTooLarge { count, limit });
    }
    Ok(())
}

// Capacity hint, capped at 2^20 rows
fn expected_rows(candidates: usize) -> usize {
    non_empty_subset_count(candidates)
        .and_then(|rows| usize::try_from(rows).ok())
        .unwrap_or(usize::MAX)
        .min(1 << 20)
}
