// Numeric helpers with pinned rounding and percentile semantics

use crate::models::ItemCount;
use serde::Serialize;

/// Rounds to `decimals` places, ties to even (2.25 -> 2.2, 2.35 -> 2.4)
pub fn round_half_even(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Percentile `q` (0..=100) with linear interpolation between closest ranks.
/// Returns `None` for an empty slice.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Summary of a per-zone item distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionStats {
    pub count: usize,
    pub min: ItemCount,
    pub max: ItemCount,
    pub mean: f64,
    pub median: f64,
    pub q25: f64,
    pub q75: f64,
}

impl DistributionStats {
    /// Describes `counts`, `None` when there is nothing to describe
    pub fn from_counts(counts: &[ItemCount]) -> Option<Self> {
        let min = *counts.iter().min()?;
        let max = *counts.iter().max()?;
        let values: Vec<f64> = counts.iter().map(|&c| c as f64).collect();

        Some(Self {
            count: counts.len(),
            min,
            max,
            mean: round_half_even(mean(&values)?, 1),
            median: round_half_even(percentile(&values, 50.0)?, 1),
            q25: round_half_even(percentile(&values, 25.0)?, 1),
            q75: round_half_even(percentile(&values, 75.0)?, 1),
        })
    }
}
