// Integration tests for the aggregation -> enumeration -> ranking pipeline
use std::collections::HashSet;

use wave_planner::algorithms::aggregation::{aggregate, build_item_matrix};
use wave_planner::models::{ItemCount, RouteKey};
use wave_planner::utils::ranking::rank_combinations;
use wave_planner::utils::synthetic::SyntheticDataset;
use wave_planner::{
    CandidateSet, CombinationResult, CombinationSolver, DeadlineFilter, DispatchDeadline,
    ItemRange, RankingPolicy, RouteRecord, ScoringMetrics, WaveEnumerator,
};

fn synthetic_candidates(routes: u64, seed: u64) -> (Vec<RouteRecord>, CandidateSet) {
    let records = SyntheticDataset {
        routes,
        zones: 6,
        deadlines: 3,
        seed,
        ..SyntheticDataset::default()
    }
    .generate();
    let matrix = build_item_matrix(&records);
    let candidates = CandidateSet::from_matrix(&matrix, &DeadlineFilter::All);
    (records, candidates)
}

fn enumerate(candidates: &CandidateSet) -> Vec<CombinationResult> {
    WaveEnumerator::new(ScoringMetrics::default(), false).enumerate(candidates)
}

fn identity(result: &CombinationResult) -> Vec<usize> {
    result.members.clone()
}

#[test]
fn test_concrete_two_route_scenario() {
    let ten = DispatchDeadline::from_hms(10, 0, 0).unwrap();
    let records = vec![
        RouteRecord::new(1, 1, ten, 10),
        RouteRecord::new(1, 2, ten, 20),
        RouteRecord::new(2, 1, ten, 5),
    ];
    let aggregates = aggregate(&records);
    let candidates = CandidateSet::from_matrix(&aggregates.matrix, &DeadlineFilter::All);
    let results = enumerate(&candidates);

    let summary: Vec<(String, ItemCount, f64)> = results
        .iter()
        .map(|r| (r.formatted_routes(), r.total_items, r.avg_per_zone))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("1".to_string(), 30, 15.0),
            ("2".to_string(), 5, 2.5),
            ("1, 2".to_string(), 35, 17.5),
        ]
    );
    assert!(results.iter().all(|r| r.earliest_deadline == ten));
}

#[test]
fn test_row_sum_invariant() {
    let (records, _) = synthetic_candidates(10, 3);
    let matrix = build_item_matrix(&records);

    for (position, key) in matrix.rows().iter().enumerate() {
        let expected: ItemCount = records
            .iter()
            .filter(|r| r.key() == *key)
            .map(|r| r.item_count)
            .sum();
        assert_eq!(matrix.row_total(position), Some(expected));
    }
}

#[test]
fn test_subset_count() {
    for routes in [0u64, 1, 4, 9] {
        let (_, candidates) = synthetic_candidates(routes, 11);
        let expected = (1usize << candidates.len()) - 1;
        assert_eq!(enumerate(&candidates).len(), expected);
    }
}

#[test]
fn test_subset_sizes_are_non_decreasing() {
    let (_, candidates) = synthetic_candidates(6, 5);
    let results = enumerate(&candidates);
    assert!(results.windows(2).all(|w| w[0].size() <= w[1].size()));
    assert_eq!(results.first().map(|r| r.size()), Some(1));
    assert_eq!(results.last().map(|r| r.size()), Some(candidates.len()));
}

#[test]
fn test_single_candidate_matches_its_row() {
    let (_, candidates) = synthetic_candidates(7, 8);
    let results = enumerate(&candidates);

    for (position, key) in candidates.keys().iter().enumerate() {
        let single = &results[position];
        let row = candidates.row(position).unwrap();
        let total: ItemCount = row.iter().sum();

        assert_eq!(single.members, vec![position]);
        assert_eq!(single.route_ids, vec![key.route_id]);
        assert_eq!(single.total_items, total);
        assert_eq!(single.earliest_deadline, key.dispatch_deadline);
        let expected_avg = total as f64 / candidates.zone_count() as f64;
        assert!((single.avg_per_zone - expected_avg).abs() <= 0.05 + 1e-9);
    }
}

#[test]
fn test_full_set_has_maximum_total() {
    let (_, candidates) = synthetic_candidates(8, 21);
    let results = enumerate(&candidates);

    let full = results.last().unwrap();
    let row_sum: ItemCount = (0..candidates.len())
        .map(|p| candidates.row(p).unwrap().iter().sum::<ItemCount>())
        .sum();
    assert_eq!(full.total_items, row_sum);
    assert!(results.iter().all(|r| r.total_items <= full.total_items));
}

#[test]
fn test_filter_keeps_exactly_rows_in_range() {
    let (_, candidates) = synthetic_candidates(8, 2);
    let results = enumerate(&candidates);
    let totals: Vec<ItemCount> = results.iter().map(|r| r.total_items).collect();
    let lo = totals.iter().min().copied().unwrap_or(0) + 50;
    let hi = lo + 300;
    let range = ItemRange::new(lo, hi).unwrap();

    let ranked = rank_combinations(&results, range, &RankingPolicy::default());
    assert!(ranked.iter().all(|r| range.contains(r.total_items)));

    let kept: HashSet<Vec<usize>> = ranked.iter().map(|r| identity(r)).collect();
    let expected: HashSet<Vec<usize>> = results
        .iter()
        .filter(|r| lo <= r.total_items && r.total_items <= hi)
        .map(identity)
        .collect();
    assert_eq!(kept, expected);
    assert_eq!(ranked.len(), expected.len());
}

#[test]
fn test_deadline_first_sort_order() {
    let (_, candidates) = synthetic_candidates(8, 13);
    let results = enumerate(&candidates);
    let ranked = rank_combinations(
        &results,
        ItemRange::new(0, u64::MAX).unwrap(),
        &RankingPolicy::deadline_first(),
    );

    for pair in ranked.windows(2) {
        assert!(pair[0].earliest_deadline <= pair[1].earliest_deadline);
        if pair[0].earliest_deadline == pair[1].earliest_deadline {
            assert!(pair[0].avg_per_zone >= pair[1].avg_per_zone);
        }
    }
}

#[test]
fn test_average_only_sort_order() {
    let (_, candidates) = synthetic_candidates(7, 17);
    let results = enumerate(&candidates);
    let ranked = rank_combinations(
        &results,
        ItemRange::new(0, u64::MAX).unwrap(),
        &RankingPolicy::average_only(),
    );
    assert!(ranked.windows(2).all(|p| p[0].avg_per_zone >= p[1].avg_per_zone));
}

#[test]
fn test_enumeration_is_deterministic() {
    let (_, candidates) = synthetic_candidates(9, 4);
    let first = enumerate(&candidates);
    let second = enumerate(&candidates);
    let parallel = WaveEnumerator::new(ScoringMetrics::default(), true).enumerate(&candidates);

    let labels = |results: &[CombinationResult]| -> Vec<String> {
        results.iter().map(|r| r.formatted_routes()).collect()
    };
    assert_eq!(labels(&first), labels(&second));
    assert_eq!(first, second);
    assert_eq!(first, parallel);
}

#[test]
fn test_repeated_route_is_two_candidates() {
    let nine = DispatchDeadline::from_hms(9, 0, 0).unwrap();
    let key = RouteKey::new(4, nine);
    let candidates = CandidateSet::new(vec![key, key], vec![1, 2], vec![vec![3, 1], vec![3, 1]])
        .unwrap();
    let results = enumerate(&candidates);

    assert_eq!(results.len(), 3);
    assert_eq!(results[2].formatted_routes(), "4, 4");
    assert_eq!(results[2].total_items, 8);
}
