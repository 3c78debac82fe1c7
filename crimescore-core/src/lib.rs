//! Crimescore core library - district crime-risk clustering and security scoring
//!
//! Districts are partitioned into three risk tiers (`low`, `medium`, `high`)
//! by k-means over normalized per-year aggregates, and scored on a 0-100
//! security scale (higher = safer) using the same per-year normalization
//! statistics.

#![deny(warnings)]

// Global invariants enforced in this crate:
// - A year must be trained before it can be scored or queried
// - Training failures store no partial model
// - Re-training a year replaces its whole model atomically
// - District iteration order during training is deterministic (sorted ids)
// - No database, file, or network I/O in the engine

pub mod config;
pub mod error;
pub mod kmeans;
pub mod labels;
pub mod model;
pub mod normalize;
pub mod report;
pub mod score;

pub use config::ResolvedConfig;
pub use error::{ScoreError, TrainError};
pub use labels::RiskLevel;
pub use model::{ModelStore, TrainedModel, CLUSTER_COUNT};
pub use normalize::{DistrictAggregate, FeatureStats, NormalizationParams};
pub use report::{render_json, render_text, sort_reports, DistrictRiskReport};
pub use score::ScoreWeights;

use std::collections::HashMap;

use kmeans::KMeansConfig;

/// The scoring engine: an explicit, caller-owned model store plus the
/// resolved weights and clustering settings.
///
/// There is no hidden global state; embedding hosts that train concurrently
/// must serialize calls for the same year themselves.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    store: ModelStore,
    weights: ScoreWeights,
    max_iterations: usize,
    seed: Option<u64>,
}

impl Default for RiskEngine {
    fn default() -> Self {
        RiskEngine::new()
    }
}

impl RiskEngine {
    /// Engine with default weights and clustering settings
    pub fn new() -> Self {
        RiskEngine {
            store: ModelStore::new(),
            weights: ScoreWeights::default(),
            max_iterations: kmeans::DEFAULT_MAX_ITERATIONS,
            seed: None,
        }
    }

    /// Engine configured from a resolved config file
    pub fn with_config(config: &ResolvedConfig) -> Self {
        RiskEngine {
            store: ModelStore::new(),
            weights: config.weights,
            max_iterations: config.max_iterations,
            seed: config.seed,
        }
    }

    fn kmeans_config(&self) -> KMeansConfig {
        let mut config = KMeansConfig::new(CLUSTER_COUNT).with_max_iterations(self.max_iterations);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }

    /// Train (or re-train) the model for one year from the full district
    /// dataset. On failure nothing is stored and prior models are untouched.
    pub fn train(
        &mut self,
        aggregates: &HashMap<String, DistrictAggregate>,
        year: i32,
    ) -> Result<(), TrainError> {
        let model = TrainedModel::fit(aggregates, year, &self.kmeans_config())?;
        self.store.insert(model);
        Ok(())
    }

    /// Security score for one observation against a trained year.
    ///
    /// The observation may be out-of-sample; it is normalized with the
    /// year's stored stats. Scoring an untrained year is a precondition
    /// violation reported as [`ScoreError::ModelNotFound`].
    pub fn score(
        &self,
        crime_count: f64,
        population_density: f64,
        unemployment_rate: f64,
        year: i32,
    ) -> Result<u8, ScoreError> {
        let params = self
            .store
            .normalization_params(year)
            .ok_or(ScoreError::ModelNotFound { year })?;
        Ok(score::security_score(
            params,
            &self.weights,
            crime_count,
            population_density,
            unemployment_rate,
        ))
    }

    /// Risk tier of one district for a trained year
    pub fn cluster_level(&self, district_id: &str, year: i32) -> Option<RiskLevel> {
        self.store.cluster_level(district_id, year)
    }

    /// Full district -> tier mapping for a trained year
    pub fn year_clusters(&self, year: i32) -> Option<&HashMap<String, RiskLevel>> {
        self.store.year_clusters(year)
    }

    /// Normalization stats for a trained year
    pub fn normalization_params(&self, year: i32) -> Option<&NormalizationParams> {
        self.store.normalization_params(year)
    }

    /// Read access to the underlying store
    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Build sorted per-district reports for a trained year.
    ///
    /// `aggregates` supplies the raw values to score; districts absent from
    /// the trained model are skipped with a warning.
    pub fn reports(
        &self,
        aggregates: &HashMap<String, DistrictAggregate>,
        year: i32,
    ) -> Result<Vec<DistrictRiskReport>, ScoreError> {
        let clusters = self
            .store
            .year_clusters(year)
            .ok_or(ScoreError::ModelNotFound { year })?;

        let mut reports = Vec::with_capacity(aggregates.len());
        for (district_id, aggregate) in aggregates {
            let Some(&level) = clusters.get(district_id) else {
                tracing::warn!(district = %district_id, year, "district not in trained model");
                continue;
            };
            let score = self.score(
                aggregate.crime_count as f64,
                aggregate.population_density,
                aggregate.unemployment_rate,
                year,
            )?;
            reports.push(DistrictRiskReport {
                district_id: district_id.clone(),
                year,
                level,
                score,
            });
        }
        Ok(sort_reports(reports))
    }
}
