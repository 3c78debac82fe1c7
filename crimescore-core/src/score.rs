//! Security score calculation
//!
//! Combines a year's stored normalization stats with one raw observation to
//! produce the public-facing 0-100 security score. The internal composite
//! (severity) is higher-is-worse; the score inverts it so that higher means
//! safer.
//!
//! Global invariants enforced:
//! - Output is always an integer in [0, 100]
//! - Non-increasing in crime count (density and unemployment held fixed)
//! - Pure arithmetic once a model exists; identical inputs yield identical
//!   output

use crate::normalize::NormalizationParams;

/// Configurable weights and exponent for the severity composite.
///
/// These are fixed domain constants encoding "crime count matters most",
/// not values derived from data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub crime: f64,
    pub density: f64,
    pub unemployment: f64,
    /// Super-linear penalty applied to the normalized crime count
    pub crime_exponent: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            crime: 0.60,
            density: 0.25,
            unemployment: 0.15,
            crime_exponent: 1.2,
        }
    }
}

/// Replace NaN or negative inputs with 0 rather than failing the pipeline
/// for one bad observation.
fn sanitize(name: &str, value: f64) -> f64 {
    if value.is_nan() || value < 0.0 {
        tracing::warn!(feature = name, value, "invalid numeric input, using 0");
        0.0
    } else {
        value
    }
}

/// Compute the security score for one observation against a year's stats.
///
/// The observation need not be a district seen during training;
/// out-of-sample values are normalized with the same stored min/range.
/// Normalized features are clamped below at 0 so a value under the training
/// minimum cannot feed a negative base into the fractional power.
pub fn security_score(
    params: &NormalizationParams,
    weights: &ScoreWeights,
    crime_count: f64,
    population_density: f64,
    unemployment_rate: f64,
) -> u8 {
    let norm_crime = params
        .crime
        .normalize(sanitize("crime_count", crime_count))
        .max(0.0);
    let norm_density = params
        .density
        .normalize(sanitize("population_density", population_density))
        .max(0.0);
    let norm_unemployment = params
        .unemployment
        .normalize(sanitize("unemployment_rate", unemployment_rate))
        .max(0.0);

    let crime_factor = norm_crime.powf(weights.crime_exponent);
    let severity = crime_factor * weights.crime
        + norm_density * weights.density
        + norm_unemployment * weights.unemployment;
    let security = 1.0 - severity;

    (security.clamp(0.0, 1.0) * 100.0).round() as u8
}
