// Filtered working set handed to the combination enumerator

use crate::error::PlanError;
use crate::models::{DispatchDeadline, ItemCount, ItemMatrix, RouteKey, ZoneId};
use std::collections::BTreeSet;

/// Which dispatch deadlines take part in a planning request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeadlineFilter {
    /// Every deadline present in the data
    #[default]
    All,
    /// Only the listed deadlines; an empty set selects nothing
    Only(BTreeSet<DispatchDeadline>),
}

impl DeadlineFilter {
    pub fn only<I: IntoIterator<Item = DispatchDeadline>>(deadlines: I) -> Self {
        Self::Only(deadlines.into_iter().collect())
    }

    pub fn accepts(&self, deadline: &DispatchDeadline) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected.contains(deadline),
        }
    }
}

/// Ordered candidates with their row-aligned zone cells.
///
/// Candidates are addressed by position, so a route listed twice is two
/// distinct candidates. All zone columns of the source matrix are kept, even
/// those every selected route leaves empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSet {
    keys: Vec<RouteKey>,
    zones: Vec<ZoneId>,
    cells: Vec<ItemCount>,
}

impl CandidateSet {
    /// Builds a candidate set from explicit rows, one per key
    pub fn new(
        keys: Vec<RouteKey>,
        zones: Vec<ZoneId>,
        rows: Vec<Vec<ItemCount>>,
    ) -> Result<Self, PlanError> {
        if keys.len() != rows.len() {
            return Err(PlanError::CandidateRowMismatch {
                keys: keys.len(),
                rows: rows.len(),
            });
        }
        if zones.is_empty() && !keys.is_empty() {
            return Err(PlanError::NoZoneColumns { keys: keys.len() });
        }

        let mut cells = Vec::with_capacity(rows.len() * zones.len());
        for (row, cells_in_row) in rows.into_iter().enumerate() {
            if cells_in_row.len() != zones.len() {
                return Err(PlanError::RaggedCandidateRow {
                    row,
                    found: cells_in_row.len(),
                    expected: zones.len(),
                });
            }
            cells.extend(cells_in_row);
        }

        Ok(Self { keys, zones, cells })
    }

    /// Selects the matrix rows whose deadline passes `filter`, in matrix order
    pub fn from_matrix(matrix: &ItemMatrix, filter: &DeadlineFilter) -> Self {
        let mut keys = Vec::new();
        let mut cells = Vec::new();

        for (key, row) in matrix.iter_rows() {
            if filter.accepts(&key.dispatch_deadline) {
                keys.push(*key);
                cells.extend_from_slice(row);
            }
        }

        Self {
            keys,
            zones: matrix.zones().to_vec(),
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[RouteKey] {
        &self.keys
    }

    pub fn key(&self, position: usize) -> Option<&RouteKey> {
        self.keys.get(position)
    }

    pub fn zones(&self) -> &[ZoneId] {
        &self.zones
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    pub fn row(&self, position: usize) -> Option<&[ItemCount]> {
        if position >= self.keys.len() {
            return None;
        }
        let width = self.zones.len();
        self.cells.get(position * width..(position + 1) * width)
    }

    /// Column sums over the rows at `members`
    pub fn zone_totals(&self, members: &[usize]) -> Vec<ItemCount> {
        let mut totals = vec![0; self.zones.len()];
        for &position in members {
            if let Some(row) = self.row(position) {
                for (total, cell) in totals.iter_mut().zip(row) {
                    *total += cell;
                }
            }
        }
        totals
    }

    /// Per-zone items of a subset, as (zone, items) pairs for charting
    pub fn zone_distribution(&self, members: &[usize]) -> Vec<(ZoneId, ItemCount)> {
        self.zones
            .iter()
            .copied()
            .zip(self.zone_totals(members))
            .collect()
    }
}
