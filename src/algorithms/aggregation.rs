use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::{info, warn};

use crate::models::{
    DeadlineSummary, DispatchDeadline, ItemCount, ItemMatrix, RouteId, RouteKey, RouteRecord,
    ZoneId,
};

/// Everything derived from one load of raw records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregates {
    pub matrix: ItemMatrix,
    pub summaries: Vec<DeadlineSummary>,
}

/// Builds the item matrix and the per-deadline summaries in one pass over the input
pub fn aggregate(records: &[RouteRecord]) -> Aggregates {
    warn_on_split_routes(records);

    let matrix = build_item_matrix(records);
    let summaries = summarize_by_deadline(records);

    info!(
        "Aggregated {} records into {} routes x {} zones over {} deadlines",
        records.len(),
        matrix.row_count(),
        matrix.zone_count(),
        summaries.len()
    );

    Aggregates { matrix, summaries }
}

/// Pivots records into a (route, deadline) x zone matrix.
///
/// Rows are ordered by route id then deadline, columns by zone id. Duplicate
/// (route, deadline, zone) rows are summed, missing cells are zero.
pub fn build_item_matrix(records: &[RouteRecord]) -> ItemMatrix {
    let mut cells_by_key: BTreeMap<RouteKey, HashMap<ZoneId, ItemCount>> = BTreeMap::new();
    let mut zones: BTreeSet<ZoneId> = BTreeSet::new();

    for record in records {
        *cells_by_key
            .entry(record.key())
            .or_default()
            .entry(record.zone_id)
            .or_insert(0) += record.item_count;
        zones.insert(record.zone_id);
    }

    let zones: Vec<ZoneId> = zones.into_iter().collect();
    let mut rows = Vec::with_capacity(cells_by_key.len());
    let mut cells = Vec::with_capacity(cells_by_key.len() * zones.len());

    for (key, zone_items) in cells_by_key {
        rows.push(key);
        cells.extend(
            zones
                .iter()
                .map(|zone| zone_items.get(zone).copied().unwrap_or(0)),
        );
    }

    ItemMatrix::from_parts(rows, zones, cells)
}

/// One summary per distinct deadline, in chronological order
pub fn summarize_by_deadline(records: &[RouteRecord]) -> Vec<DeadlineSummary> {
    #[derive(Default)]
    struct Group {
        total_items: ItemCount,
        routes: Vec<RouteId>,
        seen_routes: HashSet<RouteId>,
        zones: HashSet<ZoneId>,
    }

    let mut groups: BTreeMap<DispatchDeadline, Group> = BTreeMap::new();

    for record in records {
        let group = groups.entry(record.dispatch_deadline).or_default();
        group.total_items += record.item_count;
        if group.seen_routes.insert(record.route_id) {
            group.routes.push(record.route_id);
        }
        group.zones.insert(record.zone_id);
    }

    groups
        .into_iter()
        .map(|(deadline, group)| {
            DeadlineSummary::new(deadline, group.total_items, group.routes, group.zones.len())
        })
        .collect()
}

/// Sorted distinct deadlines, as offered to the slot selector
pub fn available_deadlines(summaries: &[DeadlineSummary]) -> Vec<DispatchDeadline> {
    let unique: BTreeSet<DispatchDeadline> =
        summaries.iter().map(|summary| summary.dispatch_deadline).collect();
    unique.into_iter().collect()
}

// A route is expected to carry a single deadline
fn warn_on_split_routes(records: &[RouteRecord]) {
    let mut first_deadline: HashMap<RouteId, DispatchDeadline> = HashMap::new();
    let mut reported: HashSet<RouteId> = HashSet::new();

    for record in records {
        let deadline = *first_deadline
            .entry(record.route_id)
            .or_insert(record.dispatch_deadline);
        if deadline != record.dispatch_deadline && reported.insert(record.route_id) {
            warn!(
                "Route {} appears under deadlines {} and {}; rows are kept apart",
                record.route_id, deadline, record.dispatch_deadline
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deadline(hour: u32) -> DispatchDeadline {
        DispatchDeadline::from_hms(hour, 0, 0).unwrap()
    }

    fn create_test_records() -> Vec<RouteRecord> {
        vec![
            RouteRecord::new(7, 2, deadline(12), 5),
            RouteRecord::new(3, 1, deadline(9), 10),
            RouteRecord::new(3, 2, deadline(9), 20),
            RouteRecord::new(5, 1, deadline(9), 4),
            RouteRecord::new(7, 3, deadline(12), 1),
        ]
    }

    #[test]
    fn test_matrix_layout() {
        let matrix = build_item_matrix(&create_test_records());

        let routes: Vec<RouteId> = matrix.rows().iter().map(|key| key.route_id).collect();
        assert_eq!(routes, vec![3, 5, 7]);
        assert_eq!(matrix.zones(), &[1, 2, 3]);
        assert_eq!(matrix.row(0), Some(&[10, 20, 0][..]));
        assert_eq!(matrix.row(1), Some(&[4, 0, 0][..]));
        assert_eq!(matrix.row(2), Some(&[0, 5, 1][..]));
    }

    #[test]
    fn test_duplicate_cells_are_summed() {
        let records = vec![
            RouteRecord::new(1, 1, deadline(9), 3),
            RouteRecord::new(1, 1, deadline(9), 4),
        ];
        let matrix = build_item_matrix(&records);
        assert_eq!(matrix.row(0), Some(&[7][..]));
    }

    #[test]
    fn test_row_sums_match_route_totals() {
        let records = create_test_records();
        let matrix = build_item_matrix(&records);

        for (position, key) in matrix.rows().iter().enumerate() {
            let expected: ItemCount = records
                .iter()
                .filter(|r| r.route_id == key.route_id)
                .map(|r| r.item_count)
                .sum();
            assert_eq!(matrix.row_total(position), Some(expected));
        }
    }

    #[test]
    fn test_summaries() {
        let summaries = summarize_by_deadline(&create_test_records());
        assert_eq!(summaries.len(), 2);

        let morning = &summaries[0];
        assert_eq!(morning.dispatch_deadline, deadline(9));
        assert_eq!(morning.total_items, 34);
        assert_eq!(morning.routes, vec![3, 5]);
        assert_eq!(morning.zone_count, 2);
        assert_eq!(morning.items_per_zone, Some(17.0));

        let noon = &summaries[1];
        assert_eq!(noon.routes, vec![7]);
        assert_eq!(noon.zone_count, 2);
        assert_eq!(noon.items_per_zone, Some(3.0));
    }

    #[test]
    fn test_empty_input() {
        let aggregates = aggregate(&[]);
        assert!(aggregates.matrix.is_empty());
        assert!(aggregates.summaries.is_empty());
        assert!(available_deadlines(&aggregates.summaries).is_empty());
    }

    #[test]
    fn test_split_route_rows_stay_apart() {
        let records = vec![
            RouteRecord::new(1, 1, deadline(9), 3),
            RouteRecord::new(1, 1, deadline(10), 4),
        ];
        let matrix = build_item_matrix(&records);
        assert_eq!(matrix.row_count(), 2);
    }
}
