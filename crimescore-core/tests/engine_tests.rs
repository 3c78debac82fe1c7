//! End-to-end tests for the train/score/query lifecycle

use std::collections::HashMap;

use crimescore_core::config::CrimescoreConfig;
use crimescore_core::{
    DistrictAggregate, RiskEngine, RiskLevel, ScoreError, TrainError,
};

fn aggregate(crime: u64, density: f64, unemployment: f64) -> DistrictAggregate {
    DistrictAggregate {
        crime_count: crime,
        population_density: density,
        unemployment_rate: unemployment,
    }
}

/// The concrete scenario: three clearly-ordered districts for 2024.
fn ordered_districts() -> HashMap<String, DistrictAggregate> {
    let mut districts = HashMap::new();
    districts.insert("A".to_string(), aggregate(10, 100.0, 5.0));
    districts.insert("B".to_string(), aggregate(50, 500.0, 20.0));
    districts.insert("C".to_string(), aggregate(90, 900.0, 40.0));
    districts
}

fn seeded_engine() -> RiskEngine {
    let config: CrimescoreConfig =
        serde_json::from_str(r#"{"clustering": {"seed": 42}}"#).unwrap();
    RiskEngine::with_config(&config.resolve().unwrap())
}

#[test]
fn training_extremes_normalize_to_unit_bounds() {
    let mut engine = seeded_engine();
    engine.train(&ordered_districts(), 2024).unwrap();

    let params = engine.normalization_params(2024).unwrap();
    assert_eq!(params.crime.normalize(10.0), 0.0);
    assert_eq!(params.crime.normalize(90.0), 1.0);
    assert_eq!(params.density.normalize(100.0), 0.0);
    assert_eq!(params.density.normalize(900.0), 1.0);
    assert_eq!(params.unemployment.normalize(5.0), 0.0);
    assert_eq!(params.unemployment.normalize(40.0), 1.0);
}

#[test]
fn score_stays_within_0_to_100() {
    let mut engine = seeded_engine();
    engine.train(&ordered_districts(), 2024).unwrap();

    for crime in [0.0, 5.0, 10.0, 50.0, 90.0, 1000.0] {
        for density in [0.0, 100.0, 900.0, 10_000.0] {
            let score = engine.score(crime, density, 20.0, 2024).unwrap();
            assert!(score <= 100);
        }
    }
}

#[test]
fn score_is_non_increasing_in_crime() {
    let mut engine = seeded_engine();
    engine.train(&ordered_districts(), 2024).unwrap();

    let mut prev = u8::MAX;
    for crime in (0..=200).step_by(5) {
        let score = engine.score(crime as f64, 500.0, 20.0, 2024).unwrap();
        assert!(score <= prev);
        prev = score;
    }
}

#[test]
fn score_is_idempotent() {
    let mut engine = seeded_engine();
    engine.train(&ordered_districts(), 2024).unwrap();

    let first = engine.score(33.0, 420.0, 12.0, 2024).unwrap();
    let second = engine.score(33.0, 420.0, 12.0, 2024).unwrap();
    assert_eq!(first, second);
}

#[test]
fn clusters_form_a_total_partition() {
    let mut districts = HashMap::new();
    for i in 0..12u64 {
        districts.insert(
            format!("d{:02}", i),
            aggregate(i * 10, 50.0 + i as f64 * 80.0, 2.0 + i as f64 * 3.0),
        );
    }

    let mut engine = seeded_engine();
    engine.train(&districts, 2024).unwrap();

    let clusters = engine.year_clusters(2024).unwrap();
    assert_eq!(clusters.len(), districts.len());
    for district in districts.keys() {
        let level = clusters.get(district).copied().unwrap();
        assert!(matches!(
            level,
            RiskLevel::Low | RiskLevel::Medium | RiskLevel::High
        ));
    }
}

#[test]
fn centroid_ordering_matches_labels() {
    let mut engine = seeded_engine();
    engine.train(&ordered_districts(), 2024).unwrap();

    let model = engine.store().get(2024).unwrap();
    let sums: HashMap<RiskLevel, f64> = model
        .district_labels
        .iter()
        .map(|(district, &level)| {
            let agg = ordered_districts()[district];
            let v = model.normalization.feature_vector(&agg);
            (level, v.iter().sum())
        })
        .collect();

    assert!(sums[&RiskLevel::Low] < sums[&RiskLevel::Medium]);
    assert!(sums[&RiskLevel::Medium] < sums[&RiskLevel::High]);
}

#[test]
fn empty_dataset_fails_and_stores_nothing() {
    let mut engine = seeded_engine();
    let result = engine.train(&HashMap::new(), 2024);
    assert_eq!(result.unwrap_err(), TrainError::EmptyDataset);
    assert!(engine.year_clusters(2024).is_none());
    assert!(engine.normalization_params(2024).is_none());
    assert_eq!(
        engine.score(10.0, 100.0, 5.0, 2024).unwrap_err(),
        ScoreError::ModelNotFound { year: 2024 }
    );
}

#[test]
fn ordered_inputs_separate_monotonically() {
    let mut engine = seeded_engine();
    engine.train(&ordered_districts(), 2024).unwrap();

    assert_eq!(engine.cluster_level("A", 2024), Some(RiskLevel::Low));
    assert_eq!(engine.cluster_level("C", 2024), Some(RiskLevel::High));

    let safe = engine.score(10.0, 100.0, 5.0, 2024).unwrap();
    let unsafe_score = engine.score(90.0, 900.0, 40.0, 2024).unwrap();
    assert!(safe > unsafe_score);
}

#[test]
fn retraining_replaces_the_whole_model() {
    let mut engine = seeded_engine();
    engine.train(&ordered_districts(), 2024).unwrap();
    assert!(engine.cluster_level("A", 2024).is_some());

    let mut replacement = HashMap::new();
    replacement.insert("X".to_string(), aggregate(5, 80.0, 3.0));
    replacement.insert("Y".to_string(), aggregate(40, 400.0, 15.0));
    replacement.insert("Z".to_string(), aggregate(95, 950.0, 45.0));
    engine.train(&replacement, 2024).unwrap();

    let clusters = engine.year_clusters(2024).unwrap();
    assert_eq!(clusters.len(), 3);
    assert!(engine.cluster_level("A", 2024).is_none());
    assert!(engine.cluster_level("X", 2024).is_some());
}

#[test]
fn years_do_not_interfere() {
    let mut engine = seeded_engine();
    engine.train(&ordered_districts(), 2023).unwrap();

    assert!(engine.year_clusters(2023).is_some());
    assert!(engine.year_clusters(2024).is_none());
    assert_eq!(
        engine.score(10.0, 100.0, 5.0, 2024).unwrap_err(),
        ScoreError::ModelNotFound { year: 2024 }
    );
}

#[test]
fn out_of_sample_observation_scores_between_extremes() {
    let mut engine = seeded_engine();
    engine.train(&ordered_districts(), 2024).unwrap();

    // Not one of the training districts; uses 2024's global stats.
    let mid = engine.score(45.0, 480.0, 18.0, 2024).unwrap();
    let safe = engine.score(10.0, 100.0, 5.0, 2024).unwrap();
    let risky = engine.score(90.0, 900.0, 40.0, 2024).unwrap();
    assert!(mid < safe);
    assert!(mid > risky);
}

#[test]
fn single_district_trains_and_scores() {
    let mut districts = HashMap::new();
    districts.insert("only".to_string(), aggregate(42, 300.0, 8.0));

    let mut engine = seeded_engine();
    engine.train(&districts, 2024).unwrap();

    let clusters = engine.year_clusters(2024).unwrap();
    assert_eq!(clusters.len(), 1);
    // The single district normalizes to the origin: top score.
    assert_eq!(engine.score(42.0, 300.0, 8.0, 2024).unwrap(), 100);
}
