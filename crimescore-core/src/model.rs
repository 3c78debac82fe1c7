//! Trained models and the per-year model store
//!
//! Global invariants enforced:
//! - A model exists for a year only after a fully successful training run
//! - Re-training replaces the whole per-year record atomically, never
//!   individual fields
//! - Lookups for an untrained year return `None`; absence is an expected,
//!   recoverable condition, not an error

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TrainError;
use crate::kmeans::{self, KMeansConfig};
use crate::labels::{self, RiskLevel};
use crate::normalize::{DistrictAggregate, NormalizationParams};

/// Number of risk tiers, and therefore clusters
pub const CLUSTER_COUNT: usize = 3;

/// Everything derived from one year's training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TrainedModel {
    pub year: i32,
    /// Cluster centroids in the normalized feature space
    pub centroids: Vec<[f64; 3]>,
    /// Risk tier per district; key set equals the training district set
    pub district_labels: HashMap<String, RiskLevel>,
    /// The stats used to normalize training data, reused for scoring
    pub normalization: NormalizationParams,
}

impl TrainedModel {
    /// Train a model for one year from the full district dataset.
    ///
    /// This is a pure value-returning constructor; callers that want
    /// year-keyed lookups insert the result into a [`ModelStore`].
    /// Districts are processed in sorted-id order so the feature vectors
    /// handed to the clustering engine have a deterministic layout.
    pub fn fit(
        aggregates: &HashMap<String, DistrictAggregate>,
        year: i32,
        config: &KMeansConfig,
    ) -> Result<TrainedModel, TrainError> {
        if aggregates.is_empty() {
            return Err(TrainError::EmptyDataset);
        }

        let mut district_ids: Vec<String> = aggregates.keys().cloned().collect();
        district_ids.sort();
        let ordered: Vec<DistrictAggregate> = district_ids
            .iter()
            .map(|id| aggregates[id])
            .collect();

        let normalization = NormalizationParams::from_aggregates(year, &ordered)
            .ok_or(TrainError::EmptyDataset)?;
        let points: Vec<[f64; 3]> = ordered
            .iter()
            .map(|a| normalization.feature_vector(a))
            .collect();

        let fit = kmeans::fit(&points, config)?;
        let district_labels = labels::assign_labels(&district_ids, &fit)?;

        Ok(TrainedModel {
            year,
            centroids: fit.centroids,
            district_labels,
            normalization,
        })
    }
}

/// Process-lifetime mapping from year to trained model
#[derive(Debug, Clone, Default)]
pub struct ModelStore {
    models: HashMap<i32, TrainedModel>,
}

impl ModelStore {
    pub fn new() -> Self {
        ModelStore::default()
    }

    /// Store a model, wholesale-replacing any prior model for the same year.
    pub fn insert(&mut self, model: TrainedModel) {
        self.models.insert(model.year, model);
    }

    pub fn get(&self, year: i32) -> Option<&TrainedModel> {
        self.models.get(&year)
    }

    /// Risk tier of one district for a trained year
    pub fn cluster_level(&self, district_id: &str, year: i32) -> Option<RiskLevel> {
        self.models
            .get(&year)?
            .district_labels
            .get(district_id)
            .copied()
    }

    /// Full district -> tier mapping for a trained year
    pub fn year_clusters(&self, year: i32) -> Option<&HashMap<String, RiskLevel>> {
        self.models.get(&year).map(|m| &m.district_labels)
    }

    /// Normalization stats for a trained year
    pub fn normalization_params(&self, year: i32) -> Option<&NormalizationParams> {
        self.models.get(&year).map(|m| &m.normalization)
    }

    /// Years with a trained model, in ascending order
    pub fn trained_years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.models.keys().copied().collect();
        years.sort_unstable();
        years
    }
}
