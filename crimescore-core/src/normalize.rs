//! Min-max feature normalization
//!
//! Computes per-year, per-feature normalization statistics over a full
//! district dataset and maps raw values into `[0,1]`.
//!
//! Global invariants enforced:
//! - Stats are computed in a single scan over the input
//! - `range` is forced to 1.0 whenever `max == min` (per feature,
//!   independently), so normalization never divides by zero
//! - Pure functions, no side effects

use serde::{Deserialize, Serialize};

/// Raw per-district, per-year aggregates supplied by callers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DistrictAggregate {
    pub crime_count: u64,
    pub population_density: f64,
    pub unemployment_rate: f64,
}

/// Min/max/range for a single feature over one year's districts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FeatureStats {
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

impl FeatureStats {
    /// Compute stats from a sequence of raw values.
    ///
    /// Returns `None` for an empty sequence.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let first = *values.first()?;
        let mut min = first;
        let mut max = first;
        for &v in &values[1..] {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
        let spread = max - min;
        // A constant feature still normalizes cleanly: everything maps to 0.
        let range = if spread == 0.0 { 1.0 } else { spread };
        Some(FeatureStats { min, max, range })
    }

    /// Map a raw value to the normalized scale.
    ///
    /// Training values land in `[0,1]`; out-of-sample values may fall
    /// outside and are not clamped here.
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.min) / self.range
    }
}

/// The full per-year normalization statistics, one `FeatureStats` per feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NormalizationParams {
    pub year: i32,
    pub crime: FeatureStats,
    pub density: FeatureStats,
    pub unemployment: FeatureStats,
}

impl NormalizationParams {
    /// Compute normalization params over all districts of one year.
    ///
    /// Returns `None` for an empty dataset.
    pub fn from_aggregates(year: i32, aggregates: &[DistrictAggregate]) -> Option<Self> {
        let crimes: Vec<f64> = aggregates.iter().map(|a| a.crime_count as f64).collect();
        let densities: Vec<f64> = aggregates.iter().map(|a| a.population_density).collect();
        let unemployment: Vec<f64> = aggregates.iter().map(|a| a.unemployment_rate).collect();

        Some(NormalizationParams {
            year,
            crime: FeatureStats::from_values(&crimes)?,
            density: FeatureStats::from_values(&densities)?,
            unemployment: FeatureStats::from_values(&unemployment)?,
        })
    }

    /// Normalize one district's aggregates into a 3-vector in `[0,1]^3`.
    pub fn feature_vector(&self, aggregate: &DistrictAggregate) -> [f64; 3] {
        [
            self.crime.normalize(aggregate.crime_count as f64),
            self.density.normalize(aggregate.population_density),
            self.unemployment.normalize(aggregate.unemployment_rate),
        ]
    }
}
