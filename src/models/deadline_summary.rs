// Per-deadline summary shown before candidates are chosen

use crate::models::{DispatchDeadline, ItemCount, RouteId};
use crate::utils::statistics::round_half_even;
use serde::Serialize;

/// Aggregate view of all routes sharing one dispatch deadline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeadlineSummary {
    pub dispatch_deadline: DispatchDeadline,

    /// Items across every route and zone of this deadline
    pub total_items: ItemCount,

    /// Distinct routes in first-seen order
    pub routes: Vec<RouteId>,

    /// Distinct zones touched by these routes
    pub zone_count: usize,

    /// `total_items / zone_count` rounded to 2 decimals, `None` without zones
    pub items_per_zone: Option<f64>,
}

impl DeadlineSummary {
    pub fn new(
        dispatch_deadline: DispatchDeadline,
        total_items: ItemCount,
        routes: Vec<RouteId>,
        zone_count: usize,
    ) -> Self {
        let items_per_zone = if zone_count == 0 {
            None
        } else {
            Some(round_half_even(total_items as f64 / zone_count as f64, 2))
        };

        Self {
            dispatch_deadline,
            total_items,
            routes,
            zone_count,
            items_per_zone,
        }
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Routes joined with ", " for table display
    pub fn routes_label(&self) -> String {
        self.routes
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
