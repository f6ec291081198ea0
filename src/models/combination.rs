// Scored subset of candidates

use crate::models::{DispatchDeadline, ItemCount, RouteId};
use serde::Serialize;

/// Statistics of one non-empty subset of the candidate set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinationResult {
    /// Candidate positions, ascending
    #[serde(skip)]
    pub members: Vec<usize>,

    /// Route ids of the members in enumeration order
    pub route_ids: Vec<RouteId>,

    /// Items over all member rows and zones
    pub total_items: ItemCount,

    /// Mean of the per-zone item sums, 1 decimal
    pub avg_per_zone: f64,

    /// 25th percentile of the per-zone item sums, 1 decimal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_quartile: Option<f64>,

    /// Tightest deadline among the members
    pub earliest_deadline: DispatchDeadline,
}

impl CombinationResult {
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Route ids joined with ", "
    pub fn formatted_routes(&self) -> String {
        self.route_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_routes_keeps_member_order() {
        let result = CombinationResult {
            members: vec![0, 2],
            route_ids: vec![17, 4],
            total_items: 12,
            avg_per_zone: 6.0,
            lower_quartile: None,
            earliest_deadline: DispatchDeadline::from_hms(8, 0, 0).unwrap(),
        };
        assert_eq!(result.formatted_routes(), "17, 4");
        assert_eq!(result.size(), 2);
    }
}
