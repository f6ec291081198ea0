// Raw route/zone rows as delivered by the data source

use crate::models::{DispatchDeadline, ItemCount, RouteId, ZoneId};
use serde::{Deserialize, Serialize};

/// One row of raw input: items reserved for a route in one picking zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub route_id: RouteId,

    pub zone_id: ZoneId,

    /// Accepts the analytical store's `car_sending_sla` column name
    #[serde(alias = "car_sending_sla")]
    pub dispatch_deadline: DispatchDeadline,

    /// Accepts the analytical store's `number_of_items` column name
    #[serde(alias = "number_of_items")]
    pub item_count: ItemCount,
}

impl RouteRecord {
    pub fn new(
        route_id: RouteId,
        zone_id: ZoneId,
        dispatch_deadline: DispatchDeadline,
        item_count: ItemCount,
    ) -> Self {
        Self {
            route_id,
            zone_id,
            dispatch_deadline,
            item_count,
        }
    }

    pub fn key(&self) -> RouteKey {
        RouteKey::new(self.route_id, self.dispatch_deadline)
    }
}

/// Row identity of the item matrix: a route together with its deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RouteKey {
    pub route_id: RouteId,
    pub dispatch_deadline: DispatchDeadline,
}

impl RouteKey {
    pub fn new(route_id: RouteId, dispatch_deadline: DispatchDeadline) -> Self {
        Self {
            route_id,
            dispatch_deadline,
        }
    }
}
