// Models module - exports all model types

mod candidate_set;
mod combination;
mod deadline;
mod deadline_summary;
mod item_matrix;
mod route_record;

// Re-export model types
pub use self::candidate_set::{CandidateSet, DeadlineFilter};
pub use self::combination::CombinationResult;
pub use self::deadline::DispatchDeadline;
pub use self::deadline_summary::DeadlineSummary;
pub use self::item_matrix::ItemMatrix;
pub use self::route_record::{RouteKey, RouteRecord};

// Common type aliases for improved code readability
pub type RouteId = u64;
pub type ZoneId = u64;
pub type ItemCount = u64;
