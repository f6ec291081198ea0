use crate::error::{ParseError, PlanError};
use crate::models::{CombinationResult, ItemCount};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Upper bound of the default item window
pub const DEFAULT_MAX_ITEMS: ItemCount = 20_000;

/// Inclusive window on a combination's total items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRange {
    pub min: ItemCount,
    pub max: ItemCount,
}

impl ItemRange {
    pub fn new(min: ItemCount, max: ItemCount) -> Result<Self, PlanError> {
        if min > max {
            return Err(PlanError::InvalidItemRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, total_items: ItemCount) -> bool {
        self.min <= total_items && total_items <= self.max
    }
}

impl Default for ItemRange {
    fn default() -> Self {
        Self {
            min: 0,
            max: DEFAULT_MAX_ITEMS,
        }
    }
}

impl fmt::Display for ItemRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

/// Metric a ranking key looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankField {
    EarliestDeadline,
    AvgPerZone,
    LowerQuartile,
    TotalItems,
    RouteCount,
}

impl RankField {
    fn compare(&self, a: &CombinationResult, b: &CombinationResult) -> Ordering {
        match self {
            Self::EarliestDeadline => a.earliest_deadline.cmp(&b.earliest_deadline),
            Self::AvgPerZone => a
                .avg_per_zone
                .partial_cmp(&b.avg_per_zone)
                .unwrap_or(Ordering::Equal),
            // A missing quartile sorts below any value
            Self::LowerQuartile => match (a.lower_quartile, b.lower_quartile) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                (x, y) => x.is_some().cmp(&y.is_some()),
            },
            Self::TotalItems => a.total_items.cmp(&b.total_items),
            Self::RouteCount => a.size().cmp(&b.size()),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::EarliestDeadline => "earliest_deadline",
            Self::AvgPerZone => "avg_per_zone",
            Self::LowerQuartile => "lower_quartile",
            Self::TotalItems => "total_items",
            Self::RouteCount => "route_count",
        }
    }
}

impl FromStr for RankField {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "earliest_deadline" | "deadline" => Ok(Self::EarliestDeadline),
            "avg_per_zone" | "average" => Ok(Self::AvgPerZone),
            "lower_quartile" | "q25" => Ok(Self::LowerQuartile),
            "total_items" | "total" => Ok(Self::TotalItems),
            "route_count" | "routes" => Ok(Self::RouteCount),
            other => Err(ParseError::RankField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "asc" => Ok(Self::Ascending),
            "desc" => Ok(Self::Descending),
            other => Err(ParseError::SortOrder(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: RankField,
    pub order: SortOrder,
}

impl SortKey {
    pub fn ascending(field: RankField) -> Self {
        Self {
            field,
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(field: RankField) -> Self {
        Self {
            field,
            order: SortOrder::Descending,
        }
    }
}

/// Ordered sort keys applied to scored combinations.
///
/// Parses from a named policy (`deadline-first`, `average-only`) or from a
/// key list such as `earliest_deadline:asc,avg_per_zone:desc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingPolicy {
    keys: Vec<SortKey>,
}

impl RankingPolicy {
    pub fn new(keys: Vec<SortKey>) -> Result<Self, ParseError> {
        if keys.is_empty() {
            return Err(ParseError::EmptyRanking);
        }
        Ok(Self { keys })
    }

    /// Tightest deadline first, then best zone balance
    pub fn deadline_first() -> Self {
        Self {
            keys: vec![
                SortKey::ascending(RankField::EarliestDeadline),
                SortKey::descending(RankField::AvgPerZone),
            ],
        }
    }

    /// Best zone balance first, deadlines ignored
    pub fn average_only() -> Self {
        Self {
            keys: vec![SortKey::descending(RankField::AvgPerZone)],
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn compare(&self, a: &CombinationResult, b: &CombinationResult) -> Ordering {
        for key in &self.keys {
            let ordering = match key.order {
                SortOrder::Ascending => key.field.compare(a, b),
                SortOrder::Descending => key.field.compare(b, a),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self::deadline_first()
    }
}

impl FromStr for RankingPolicy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "deadline-first" => return Ok(Self::deadline_first()),
            "average-only" => return Ok(Self::average_only()),
            _ => {}
        }

        let keys = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(|part| -> Result<SortKey, ParseError> {
                match part.split_once(':') {
                    Some((field, order)) => Ok(SortKey {
                        field: field.parse()?,
                        order: order.parse()?,
                    }),
                    None => Ok(SortKey::ascending(part.parse()?)),
                }
            })
            .collect::<Result<Vec<_>, ParseError>>()?;

        Self::new(keys)
    }
}

impl fmt::Display for RankingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .keys
            .iter()
            .map(|key| {
                let order = match key.order {
                    SortOrder::Ascending => "asc",
                    SortOrder::Descending => "desc",
                };
                format!("{}:{}", key.field.name(), order)
            })
            .collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Keeps combinations inside `range` and orders them by `policy`.
///
/// The sort is stable, so ties keep enumeration order. The input is untouched.
pub fn rank_combinations<'a>(
    results: &'a [CombinationResult],
    range: ItemRange,
    policy: &RankingPolicy,
) -> Vec<&'a CombinationResult> {
    let mut ranked: Vec<&CombinationResult> = results
        .iter()
        .filter(|result| range.contains(result.total_items))
        .collect();
    ranked.sort_by(|a, b| policy.compare(a, b));
    ranked
}
