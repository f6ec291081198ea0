// Public modules
pub mod algorithms;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod utils;

// Re-exports for convenience
pub use algorithms::enumerator::{ScoringMetrics, WaveEnumerator};
pub use algorithms::CombinationSolver;
pub use config::PlannerConfig;
pub use models::{
    CandidateSet, CombinationResult, DeadlineFilter, DeadlineSummary, DispatchDeadline, ItemMatrix,
    RouteRecord,
};
pub use session::{PlanRequest, WaveSession};
pub use utils::ranking::{ItemRange, RankingPolicy};
