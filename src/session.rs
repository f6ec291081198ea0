// Per-user planning context: loaded aggregates, the last candidate set and
// its scored combinations. Nothing here is shared between sessions.

use tracing::{info, warn};

use crate::algorithms::aggregation::{aggregate, available_deadlines, Aggregates};
use crate::algorithms::enumerator::check_candidate_limit;
use crate::algorithms::CombinationSolver;
use crate::config::PlannerConfig;
use crate::error::{LoadError, PlanError};
use crate::models::{
    CandidateSet, CombinationResult, DeadlineFilter, DeadlineSummary, DispatchDeadline, ItemCount,
    ItemMatrix, RouteRecord, ZoneId,
};
use crate::utils::load_records::RecordSource;
use crate::utils::ranking::{rank_combinations, ItemRange};
use crate::utils::statistics::DistributionStats;

/// Filter parameters of one "compute combinations" action
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanRequest {
    pub deadlines: DeadlineFilter,
    /// `None` uses the session's configured item window
    pub item_range: Option<ItemRange>,
}

impl PlanRequest {
    pub fn new(deadlines: DeadlineFilter, item_range: ItemRange) -> Self {
        Self {
            deadlines,
            item_range: Some(item_range),
        }
    }

    /// Request over `deadlines` that keeps the configured item window
    pub fn for_deadlines(deadlines: DeadlineFilter) -> Self {
        Self {
            deadlines,
            item_range: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WaveSession {
    config: PlannerConfig,
    aggregates: Aggregates,
    candidates: CandidateSet,
    results: Vec<CombinationResult>,
}

impl WaveSession {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Replaces the session data with a fresh fetch from `source`
    pub fn load<S: RecordSource + ?Sized>(&mut self, source: &S) -> Result<usize, LoadError> {
        let records = source.fetch()?;
        self.load_records(&records);
        Ok(records.len())
    }

    /// Rebuilds aggregates from `records` and drops any earlier combinations
    pub fn load_records(&mut self, records: &[RouteRecord]) {
        self.aggregates = aggregate(records);
        self.candidates = CandidateSet::default();
        self.results.clear();
    }

    pub fn has_data(&self) -> bool {
        !self.aggregates.matrix.is_empty()
    }

    pub fn summaries(&self) -> &[DeadlineSummary] {
        &self.aggregates.summaries
    }

    pub fn matrix(&self) -> &ItemMatrix {
        &self.aggregates.matrix
    }

    pub fn available_deadlines(&self) -> Vec<DispatchDeadline> {
        available_deadlines(&self.aggregates.summaries)
    }

    pub fn select_candidates(&self, filter: &DeadlineFilter) -> CandidateSet {
        CandidateSet::from_matrix(&self.aggregates.matrix, filter)
    }

    /// Enumerates every subset of the routes passing `filter`.
    ///
    /// Fails without enumerating when the candidate count exceeds the
    /// configured ceiling; previous results are discarded either way.
    pub fn compute(&mut self, filter: &DeadlineFilter) -> Result<usize, PlanError> {
        self.results.clear();
        let candidates = self.select_candidates(filter);

        if let Err(e) = check_candidate_limit(candidates.len(), self.config.max_candidates) {
            warn!("Refusing to enumerate: {}", e);
            self.candidates = CandidateSet::default();
            return Err(e);
        }
        if candidates.is_empty() {
            info!("No routes match the selected deadlines");
        }

        self.results = self.config.enumerator().enumerate(&candidates);
        self.candidates = candidates;
        Ok(self.results.len())
    }

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    /// Combinations of the last `compute`, in enumeration order
    pub fn results(&self) -> &[CombinationResult] {
        &self.results
    }

    /// Last combinations inside `range`, ordered by the configured policy
    pub fn ranked(&self, range: ItemRange) -> Vec<&CombinationResult> {
        rank_combinations(&self.results, range, &self.config.ranking)
    }

    /// Compute then rank in one step
    pub fn plan(&mut self, request: &PlanRequest) -> Result<Vec<&CombinationResult>, PlanError> {
        let item_range = request.item_range.unwrap_or(self.config.item_range);
        let scored = self.compute(&request.deadlines)?;
        let ranked = self.ranked(item_range);
        info!(
            "{} of {} combinations fall within {} items",
            ranked.len(),
            scored,
            item_range
        );
        Ok(ranked)
    }

    /// Per-zone items of a combination from the last `compute`.
    /// `None` when `result` was scored against another candidate set.
    pub fn zone_distribution(
        &self,
        result: &CombinationResult,
    ) -> Option<Vec<(ZoneId, ItemCount)>> {
        self.scored_here(result)
            .then(|| self.candidates.zone_distribution(&result.members))
    }

    pub fn distribution_stats(&self, result: &CombinationResult) -> Option<DistributionStats> {
        if !self.scored_here(result) {
            return None;
        }
        DistributionStats::from_counts(&self.candidates.zone_totals(&result.members))
    }

    // Members must point at the same routes and deadlines they were scored with
    fn scored_here(&self, result: &CombinationResult) -> bool {
        if result.members.is_empty() || result.members.len() != result.route_ids.len() {
            return false;
        }
        let mut earliest: Option<DispatchDeadline> = None;
        for (&position, &route_id) in result.members.iter().zip(&result.route_ids) {
            match self.candidates.key(position) {
                Some(key) if key.route_id == route_id => {
                    earliest = Some(match earliest {
                        Some(current) => current.min(key.dispatch_deadline),
                        None => key.dispatch_deadline,
                    });
                }
                _ => return false,
            }
        }
        earliest == Some(result.earliest_deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RouteRecord;

    fn deadline(hour: u32) -> DispatchDeadline {
        DispatchDeadline::from_hms(hour, 0, 0).unwrap()
    }

    fn create_test_records() -> Vec<RouteRecord> {
        vec![
            RouteRecord::new(1, 10, deadline(9), 10),
            RouteRecord::new(1, 20, deadline(9), 20),
            RouteRecord::new(2, 10, deadline(9), 5),
            RouteRecord::new(3, 20, deadline(13), 40),
        ]
    }

    fn sequential_config() -> PlannerConfig {
        PlannerConfig {
            parallel: false,
            ..PlannerConfig::default()
        }
    }

    #[test]
    fn test_empty_session() {
        let mut session = WaveSession::new(sequential_config());
        assert!(!session.has_data());
        assert!(session.summaries().is_empty());
        assert_eq!(session.compute(&DeadlineFilter::All), Ok(0));
        assert!(session.results().is_empty());
    }

    #[test]
    fn test_load_and_plan() {
        let mut session = WaveSession::new(sequential_config());
        let loaded = session.load(&create_test_records()).unwrap();
        assert_eq!(loaded, 4);
        assert_eq!(session.available_deadlines(), vec![deadline(9), deadline(13)]);

        let request = PlanRequest::new(DeadlineFilter::only([deadline(9)]), ItemRange::default());
        let ranked = session.plan(&request).unwrap();
        let routes: Vec<String> = ranked.iter().map(|r| r.formatted_routes()).collect();
        // All at 09:00: {1,2} avg 17.5, {1} avg 15.0, {2} avg 2.5
        assert_eq!(routes, vec!["1, 2", "1", "2"]);
    }

    #[test]
    fn test_candidate_limit_is_enforced() {
        let config = PlannerConfig {
            max_candidates: 2,
            parallel: false,
            ..PlannerConfig::default()
        };
        let mut session = WaveSession::new(config);
        session.load_records(&create_test_records());

        assert_eq!(
            session.compute(&DeadlineFilter::All),
            Err(PlanError::CandidateSetTooLarge { count: 3, limit: 2 })
        );
        assert!(session.results().is_empty());
        assert!(session.candidates().is_empty());
    }

    #[test]
    fn test_distribution_of_result() {
        let mut session = WaveSession::new(sequential_config());
        session.load_records(&create_test_records());
        session.compute(&DeadlineFilter::All).unwrap();

        let everything = session
            .results()
            .iter()
            .find(|r| r.size() == 3)
            .cloned()
            .unwrap();
        assert_eq!(
            session.zone_distribution(&everything),
            Some(vec![(10, 15), (20, 60)])
        );

        let stats = session.distribution_stats(&everything).unwrap();
        assert_eq!(stats.min, 15);
        assert_eq!(stats.max, 60);
        assert_eq!(stats.mean, 37.5);
    }

    #[test]
    fn test_reload_discards_results() {
        let mut session = WaveSession::new(sequential_config());
        session.load_records(&create_test_records());
        session.compute(&DeadlineFilter::All).unwrap();
        assert_eq!(session.results().len(), 7);

        session.load_records(&[]);
        assert!(session.results().is_empty());
        assert!(!session.has_data());
    }

    #[test]
    fn test_plan_defaults_to_configured_item_range() {
        let config = PlannerConfig {
            item_range: ItemRange::new(0, 30).unwrap(),
            ..sequential_config()
        };
        let mut session = WaveSession::new(config);
        session.load_records(&create_test_records());

        let ranked = session.plan(&PlanRequest::default()).unwrap();
        let totals: Vec<ItemCount> = ranked.iter().map(|r| r.total_items).collect();
        // {1} = 30, {2} = 5; every set holding route 3 carries 40+
        assert_eq!(totals.len(), 2);
        assert!(totals.iter().all(|&t| t <= 30));

        // An explicit window still wins over the configured one
        let request = PlanRequest::new(DeadlineFilter::All, ItemRange::default());
        assert_eq!(session.plan(&request).unwrap().len(), 7);
    }

    #[test]
    fn test_stale_result_has_no_distribution() {
        let mut session = WaveSession::new(sequential_config());
        session.load_records(&create_test_records());
        session.compute(&DeadlineFilter::All).unwrap();
        // Route 3 alone, at position 2 of the full candidate set
        let route_three = session
            .results()
            .iter()
            .find(|r| r.route_ids == vec![3])
            .cloned()
            .unwrap();
        assert_eq!(
            session.zone_distribution(&route_three),
            Some(vec![(10, 0), (20, 40)])
        );

        session.compute(&DeadlineFilter::only([deadline(9)])).unwrap();
        assert_eq!(session.zone_distribution(&route_three), None);
        assert_eq!(session.distribution_stats(&route_three), None);
    }
}
