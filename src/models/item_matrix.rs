// Dense route x zone item matrix

use crate::models::{ItemCount, RouteKey, ZoneId};
use std::collections::HashMap;

/// Item counts per route (rows) and picking zone (columns).
///
/// Cells are stored row-major. A route that never touches a zone holds an
/// explicit zero. The matrix is immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemMatrix {
    /// Row identities in matrix order
    rows: Vec<RouteKey>,

    /// Column identities in matrix order
    zones: Vec<ZoneId>,

    /// Row-major cells, `rows.len() * zones.len()` long
    cells: Vec<ItemCount>,

    row_index: HashMap<RouteKey, usize>,
    zone_index: HashMap<ZoneId, usize>,
}

impl ItemMatrix {
    /// Assembles a matrix from already pivoted parts.
    /// `cells` must be row-major with exactly `rows.len() * zones.len()` entries.
    pub(crate) fn from_parts(
        rows: Vec<RouteKey>,
        zones: Vec<ZoneId>,
        cells: Vec<ItemCount>,
    ) -> Self {
        debug_assert_eq!(cells.len(), rows.len() * zones.len());

        let row_index = rows.iter().enumerate().map(|(i, key)| (*key, i)).collect();
        let zone_index = zones.iter().enumerate().map(|(i, zone)| (*zone, i)).collect();

        Self {
            rows,
            zones,
            cells,
            row_index,
            zone_index,
        }
    }

    pub fn rows(&self) -> &[RouteKey] {
        &self.rows
    }

    pub fn zones(&self) -> &[ZoneId] {
        &self.zones
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a (route, deadline) row
    pub fn row_of(&self, key: &RouteKey) -> Option<usize> {
        self.row_index.get(key).copied()
    }

    /// Position of a zone column
    pub fn zone_position(&self, zone_id: ZoneId) -> Option<usize> {
        self.zone_index.get(&zone_id).copied()
    }

    /// Zone cells of the row at `position`
    pub fn row(&self, position: usize) -> Option<&[ItemCount]> {
        if position >= self.rows.len() {
            return None;
        }
        let width = self.zones.len();
        self.cells.get(position * width..(position + 1) * width)
    }

    /// Items for a route in a zone; `Some(0)` when both are known but never met
    pub fn get(&self, key: &RouteKey, zone_id: ZoneId) -> Option<ItemCount> {
        let row = self.row(self.row_of(key)?)?;
        row.get(self.zone_position(zone_id)?).copied()
    }

    /// Sum of all zone cells of one row
    pub fn row_total(&self, position: usize) -> Option<ItemCount> {
        self.row(position).map(|cells| cells.iter().sum())
    }

    /// Iterates rows together with their keys in matrix order
    pub fn iter_rows(&self) -> impl Iterator<Item = (&RouteKey, &[ItemCount])> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter_map(move |(i, key)| self.row(i).map(|cells| (key, cells)))
    }
}
