// Error types shared across the planner

use crate::models::ItemCount;
use thiserror::Error;

/// Failure to read raw route records from a data source
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read records from {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV record")]
    Csv(#[from] csv::Error),
    #[error("malformed JSON records")]
    Json(#[from] serde_json::Error),
}

/// Failure while preparing or running a combination request
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlanError {
    #[error("candidate set too large: {count} routes selected, limit is {limit}")]
    CandidateSetTooLarge { count: usize, limit: usize },
    #[error("invalid item range: min {min} is greater than max {max}")]
    InvalidItemRange { min: ItemCount, max: ItemCount },
    #[error("candidate row {row} has {found} zone cells, expected {expected}")]
    RaggedCandidateRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("{keys} candidates supplied without any zone column")]
    NoZoneColumns { keys: usize },
    #[error("{keys} candidates supplied with {rows} matrix rows")]
    CandidateRowMismatch { keys: usize, rows: usize },
}

/// Invalid value in the planner configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has invalid value {value:?}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Unparsable dispatch deadline or ranking policy text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid dispatch deadline {0:?}, expected HH:MM or HH:MM:SS")]
    Deadline(String),
    #[error("unknown ranking field {0:?}")]
    RankField(String),
    #[error("unknown sort order {0:?}, expected asc or desc")]
    SortOrder(String),
    #[error("ranking policy has no sort keys")]
    EmptyRanking,
}
