//! K-means clustering over normalized feature vectors
//!
//! Lloyd's algorithm with k-means++ initialization and a bounded iteration
//! count. Cluster indices are arbitrary across runs; callers that need a
//! stable ordering must rank the centroids themselves (see `labels`).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::TrainError;

/// Default iteration bound; the only built-in limit on clustering work.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Clustering configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KMeansConfig {
    /// Number of clusters
    pub k: usize,
    /// Maximum Lloyd iterations
    pub max_iterations: usize,
    /// Seed for reproducible initialization; entropy-seeded when `None`
    pub seed: Option<u64>,
}

impl KMeansConfig {
    pub fn new(k: usize) -> Self {
        KMeansConfig {
            k,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: None,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Result of a clustering run
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// Final centroids, in the same normalized space as the input
    pub centroids: Vec<[f64; 3]>,
    /// Cluster index per input vector, order-preserving
    pub assignments: Vec<usize>,
    /// Lloyd iterations actually run
    pub iterations: usize,
}

/// Partition `points` into `config.k` clusters.
///
/// Fails on an empty input rather than returning degenerate output; callers
/// must treat "no districts" as a hard training failure.
pub fn fit(points: &[[f64; 3]], config: &KMeansConfig) -> Result<KMeansFit, TrainError> {
    if points.is_empty() {
        return Err(TrainError::EmptyDataset);
    }
    if config.k == 0 {
        return Err(TrainError::ClusteringFailure(
            "cluster count must be at least 1".to_string(),
        ));
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut centroids = plus_plus_init(points, config.k, &mut rng);
    let mut assignments = vec![0usize; points.len()];
    let mut iterations = 0;

    for iter in 0..config.max_iterations {
        iterations = iter + 1;
        let mut changed = false;

        // Assignment step
        for (i, point) in points.iter().enumerate() {
            let nearest = nearest_centroid(point, &centroids);
            if nearest != assignments[i] {
                assignments[i] = nearest;
                changed = true;
            }
        }

        // Update step: centroid = mean of its assigned points
        let mut sums = vec![[0.0f64; 3]; config.k];
        let mut counts = vec![0usize; config.k];
        for (point, &cluster) in points.iter().zip(assignments.iter()) {
            counts[cluster] += 1;
            for d in 0..3 {
                sums[cluster][d] += point[d];
            }
        }
        for cluster in 0..config.k {
            // An empty cluster keeps its previous centroid.
            if counts[cluster] > 0 {
                for d in 0..3 {
                    centroids[cluster][d] = sums[cluster][d] / counts[cluster] as f64;
                }
            }
        }

        if !changed && iter > 0 {
            break;
        }
    }

    Ok(KMeansFit {
        centroids,
        assignments,
        iterations,
    })
}

/// K-means++ initialization: the first centroid is uniform-random, each
/// subsequent one is drawn with probability proportional to its squared
/// distance from the nearest already-chosen centroid.
fn plus_plus_init(points: &[[f64; 3]], k: usize, rng: &mut StdRng) -> Vec<[f64; 3]> {
    let mut centroids = Vec::with_capacity(k);
    let first = rng.gen_range(0..points.len());
    centroids.push(points[first]);

    for _ in 1..k {
        let distances: Vec<f64> = points
            .iter()
            .map(|p| {
                centroids
                    .iter()
                    .map(|c| distance_sq(p, c))
                    .fold(f64::MAX, f64::min)
            })
            .collect();

        let total: f64 = distances.iter().sum();
        if total == 0.0 {
            // Every point already coincides with a centroid (fewer distinct
            // points than k); duplicate one at random.
            let idx = rng.gen_range(0..points.len());
            centroids.push(points[idx]);
            continue;
        }

        let threshold = rng.gen::<f64>() * total;
        let mut cumulative = 0.0;
        let mut selected = points.len() - 1;
        for (i, &d) in distances.iter().enumerate() {
            cumulative += d;
            if cumulative >= threshold {
                selected = i;
                break;
            }
        }
        centroids.push(points[selected]);
    }

    centroids
}

/// Index of the centroid closest to `point` (first wins on exact ties).
fn nearest_centroid(point: &[f64; 3], centroids: &[[f64; 3]]) -> usize {
    let mut best = 0;
    let mut best_dist = distance_sq(point, &centroids[0]);
    for (i, centroid) in centroids.iter().enumerate().skip(1) {
        let dist = distance_sq(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

/// Squared Euclidean distance; comparisons never need the sqrt.
fn distance_sq(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}
