// Reproducible route/zone data for demos and benchmarks

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{DispatchDeadline, ItemCount, RouteRecord};

/// Shape of a generated dataset
#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    pub routes: u64,
    pub zones: u64,
    /// Distinct dispatch slots, spread on the hour from 06:00
    pub deadlines: u32,
    /// Chance that a route picks from a given zone
    pub zone_density: f64,
    pub max_items_per_zone: ItemCount,
    pub seed: u64,
}

impl Default for SyntheticDataset {
    fn default() -> Self {
        Self {
            routes: 12,
            zones: 8,
            deadlines: 4,
            zone_density: 0.6,
            max_items_per_zone: 120,
            seed: 42,
        }
    }
}

impl SyntheticDataset {
    /// Generates records; every route gets at least one zone
    pub fn generate(&self) -> Vec<RouteRecord> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let slots: Vec<DispatchDeadline> = (0..self.deadlines.clamp(1, 18))
            .filter_map(|slot| DispatchDeadline::from_hms(6 + slot, 0, 0))
            .collect();
        let zones = self.zones.max(1);
        let density = self.zone_density.clamp(0.0, 1.0);
        let max_items = self.max_items_per_zone.max(1);

        let mut records = Vec::new();
        for route_index in 0..self.routes {
            let route_id = 1000 + route_index;
            let deadline = slots[rng.gen_range(0..slots.len())];

            let mut touched = false;
            for zone_id in 1..=zones {
                if rng.gen_bool(density) {
                    let items = rng.gen_range(1..=max_items);
                    records.push(RouteRecord::new(route_id, zone_id, deadline, items));
                    touched = true;
                }
            }
            if !touched {
                let zone_id = rng.gen_range(1..=zones);
                let items = rng.gen_range(1..=max_items);
                records.push(RouteRecord::new(route_id, zone_id, deadline, items));
            }
        }
        records
    }
}
