//! Configuration file support
//!
//! Loads project-specific configuration from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.crimescorerc.json` in the working directory
//! 3. `crimescore.config.json` in the working directory
//!
//! All fields are optional. CLI flags take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::kmeans::DEFAULT_MAX_ITERATIONS;
use crate::score::ScoreWeights;

/// Crimescore configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrimescoreConfig {
    /// Custom severity weights and crime exponent
    #[serde(default)]
    pub weights: Option<WeightConfig>,

    /// Clustering engine settings
    #[serde(default)]
    pub clustering: Option<ClusteringConfig>,
}

/// Custom weights for the severity composite
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightConfig {
    /// Weight for normalized crime count (default: 0.60)
    pub crime: Option<f64>,
    /// Weight for normalized population density (default: 0.25)
    pub density: Option<f64>,
    /// Weight for normalized unemployment rate (default: 0.15)
    pub unemployment: Option<f64>,
    /// Exponent applied to normalized crime count (default: 1.2)
    pub crime_exponent: Option<f64>,
}

/// Clustering engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusteringConfig {
    /// Maximum k-means iterations (default: 100)
    pub max_iterations: Option<usize>,
    /// Seed for reproducible centroid initialization (default: entropy)
    pub seed: Option<u64>,
}

/// Resolved configuration with concrete values
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub weights: ScoreWeights,
    pub max_iterations: usize,
    pub seed: Option<u64>,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl CrimescoreConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref w) = self.weights {
            for (name, val) in [
                ("crime", w.crime),
                ("density", w.density),
                ("unemployment", w.unemployment),
            ] {
                if let Some(v) = val {
                    if v < 0.0 {
                        anyhow::bail!("weights.{} must be non-negative (got {})", name, v);
                    }
                    if v > 10.0 {
                        anyhow::bail!("weights.{} must be at most 10.0 (got {})", name, v);
                    }
                }
            }
            if let Some(exp) = w.crime_exponent {
                if exp < 1.0 {
                    anyhow::bail!(
                        "weights.crime_exponent must be at least 1.0 (got {})",
                        exp
                    );
                }
            }
        }

        if let Some(ref c) = self.clustering {
            if let Some(iters) = c.max_iterations {
                if iters == 0 {
                    anyhow::bail!("clustering.max_iterations must be at least 1");
                }
            }
        }

        Ok(())
    }

    /// Resolve config into concrete form ready for use
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let defaults = ScoreWeights::default();
        let weights = match &self.weights {
            Some(w) => ScoreWeights {
                crime: w.crime.unwrap_or(defaults.crime),
                density: w.density.unwrap_or(defaults.density),
                unemployment: w.unemployment.unwrap_or(defaults.unemployment),
                crime_exponent: w.crime_exponent.unwrap_or(defaults.crime_exponent),
            },
            None => defaults,
        };

        let (max_iterations, seed) = match &self.clustering {
            Some(c) => (c.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS), c.seed),
            None => (DEFAULT_MAX_ITERATIONS, None),
        };

        Ok(ResolvedConfig {
            weights,
            max_iterations,
            seed,
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        CrimescoreConfig::default().resolve()
    }
}

/// Discover and load a config file from the project root
///
/// Search order:
/// 1. `.crimescorerc.json`
/// 2. `crimescore.config.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(project_root: &Path) -> Result<Option<(CrimescoreConfig, PathBuf)>> {
    let rc_path = project_root.join(".crimescorerc.json");
    if rc_path.exists() {
        let config = load_config_file(&rc_path)?;
        return Ok(Some((config, rc_path)));
    }

    let config_path = project_root.join("crimescore.config.json");
    if config_path.exists() {
        let config = load_config_file(&config_path)?;
        return Ok(Some((config, config_path)));
    }

    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<CrimescoreConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: CrimescoreConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config for a project
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config from the project root.
/// Returns default config if nothing is found.
pub fn load_and_resolve(project_root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(project_root)? {
            Some((config, path)) => (config, Some(path)),
            None => (CrimescoreConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}
