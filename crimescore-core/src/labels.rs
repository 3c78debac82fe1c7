//! Risk tier assignment from clustering output
//!
//! Cluster indices coming out of k-means are arbitrary. Ranking the three
//! centroids by the scalar sum of their normalized coordinates converts
//! those indices into a stable semantic ordering: smallest sum is `low`,
//! largest is `high`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TrainError;
use crate::kmeans::KMeansFit;

/// Semantic risk tier for a cluster of districts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const LEVELS_BY_RANK: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

/// Map each cluster index to a risk level by ranking centroid coordinate
/// sums in ascending order.
///
/// The sort is stable: centroids with exactly equal sums keep the clustering
/// engine's original cluster-index order, so the tie-break is deterministic
/// rather than an accident of the sort implementation.
pub fn rank_centroids(centroids: &[[f64; 3]]) -> Result<Vec<RiskLevel>, TrainError> {
    if centroids.len() != LEVELS_BY_RANK.len() {
        return Err(TrainError::ClusteringFailure(format!(
            "expected {} centroids, got {}",
            LEVELS_BY_RANK.len(),
            centroids.len()
        )));
    }

    let mut order: Vec<usize> = (0..centroids.len()).collect();
    order.sort_by(|&a, &b| {
        let sum_a: f64 = centroids[a].iter().sum();
        let sum_b: f64 = centroids[b].iter().sum();
        sum_a.partial_cmp(&sum_b).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut levels = [RiskLevel::Low; 3];
    for (rank, &cluster) in order.iter().enumerate() {
        levels[cluster] = LEVELS_BY_RANK[rank];
    }
    Ok(levels.to_vec())
}

/// Build the final district -> level mapping from a clustering fit.
///
/// `district_ids` must be index-aligned with the vectors that produced
/// `fit.assignments`. The resulting map must cover every district exactly
/// once; any mismatch fails the whole training operation.
pub fn assign_labels(
    district_ids: &[String],
    fit: &KMeansFit,
) -> Result<HashMap<String, RiskLevel>, TrainError> {
    if district_ids.len() != fit.assignments.len() {
        return Err(TrainError::ClusteringFailure(format!(
            "{} districts but {} cluster assignments",
            district_ids.len(),
            fit.assignments.len()
        )));
    }

    let levels = rank_centroids(&fit.centroids)?;
    let mut labels = HashMap::with_capacity(district_ids.len());
    for (district, &cluster) in district_ids.iter().zip(fit.assignments.iter()) {
        let level = *levels.get(cluster).ok_or_else(|| {
            TrainError::ClusteringFailure(format!("cluster index {} out of range", cluster))
        })?;
        labels.insert(district.clone(), level);
    }

    if labels.len() != district_ids.len() {
        return Err(TrainError::ClusteringFailure(format!(
            "label map has {} entries for {} districts",
            labels.len(),
            district_ids.len()
        )));
    }

    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit_with(centroids: Vec<[f64; 3]>, assignments: Vec<usize>) -> KMeansFit {
        KMeansFit {
            centroids,
            assignments,
            iterations: 1,
        }
    }

    #[test]
    fn test_rank_centroids_ascending_sum() {
        let centroids = [
            [0.9, 0.9, 0.9], // sum 2.7 -> high
            [0.1, 0.0, 0.1], // sum 0.2 -> low
            [0.5, 0.4, 0.5], // sum 1.4 -> medium
        ];
        let levels = rank_centroids(&centroids).unwrap();
        assert_eq!(levels[0], RiskLevel::High);
        assert_eq!(levels[1], RiskLevel::Low);
        assert_eq!(levels[2], RiskLevel::Medium);
    }

    #[test]
    fn test_rank_rejects_wrong_centroid_count() {
        let centroids = [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];
        assert!(rank_centroids(&centroids).is_err());
    }

    #[test]
    fn test_tie_break_preserves_cluster_index_order() {
        // All three sums equal: stable sort keeps index order, so cluster 0
        // is low, 1 is medium, 2 is high.
        let centroids = [[0.5, 0.0, 0.0], [0.0, 0.5, 0.0], [0.0, 0.0, 0.5]];
        let levels = rank_centroids(&centroids).unwrap();
        assert_eq!(
            levels,
            vec![RiskLevel::Low, RiskLevel::Medium, RiskLevel::High]
        );
    }

    #[test]
    fn test_assign_labels_total_partition() {
        let fit = fit_with(
            vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.5], [1.0, 1.0, 1.0]],
            vec![0, 1, 2, 0],
        );
        let ids: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let labels = assign_labels(&ids, &fit).unwrap();
        assert_eq!(labels.len(), 4);
        assert_eq!(labels["a"], RiskLevel::Low);
        assert_eq!(labels["b"], RiskLevel::Medium);
        assert_eq!(labels["c"], RiskLevel::High);
        assert_eq!(labels["d"], RiskLevel::Low);
    }

    #[test]
    fn test_assign_labels_count_mismatch_fails() {
        let fit = fit_with(
            vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.5], [1.0, 1.0, 1.0]],
            vec![0, 1],
        );
        let ids: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert!(assign_labels(&ids, &fit).is_err());
    }

    #[test]
    fn test_risk_level_strings() {
        assert_eq!(RiskLevel::Low.as_str(), "low");
        assert_eq!(RiskLevel::Medium.as_str(), "medium");
        assert_eq!(RiskLevel::High.as_str(), "high");
    }
}
