//! Seeded k-means clustering.
//!
//! Centroids are initialized with k-means++ from a `StdRng` seeded by the
//! configuration, then refined with Lloyd iterations until the assignment is
//! stable, the centroid shift drops under the tolerance, or the iteration cap
//! is reached. The same seed and input always produce the same partition.

use ahash::AHashSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::clustering::weights::FeatureVector;
use crate::error::{Result, WordTierError};

/// Settings for a k-means run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KMeansConfig {
    /// Number of clusters.
    pub n_clusters: usize,
    /// Iteration cap per initialization.
    pub max_iterations: usize,
    /// Convergence tolerance, relative to the mean feature variance.
    pub tolerance: f64,
    /// Number of initializations.
    pub n_init: usize,
    /// Random seed.
    pub seed: u64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            n_clusters: 3,
            max_iterations: 300,
            tolerance: 1e-4,
            n_init: 10,
            seed: 42,
        }
    }
}

/// Result of a k-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// Cluster id of every point, in input order.
    pub labels: Vec<usize>,
    /// Final centroids, indexed by cluster id.
    pub centroids: Vec<FeatureVector>,
    /// Sum of squared distances to the assigned centroid.
    pub inertia: f64,
    /// Lloyd iterations used by the winning initialization.
    pub iterations: usize,
}

impl KMeansFit {
    /// Number of points in each cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.len()];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}

/// Squared Euclidean distance.
pub fn squared_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Euclidean distance.
pub fn euclidean_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    squared_distance(a, b).sqrt()
}

/// Number of distinct points.
pub fn count_distinct(points: &[FeatureVector]) -> usize {
    // Adding 0.0 folds -0.0 into 0.0 before comparing bit patterns.
    points
        .iter()
        .map(|p| p.map(|v| (v + 0.0).to_bits()))
        .collect::<AHashSet<_>>()
        .len()
}

/// Seeded k-means clusterer.
#[derive(Debug, Clone)]
pub struct KMeans {
    config: KMeansConfig,
}

impl KMeans {
    /// Create a new clusterer.
    pub fn new(config: KMeansConfig) -> Self {
        KMeans { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    /// Partition the points into `n_clusters` clusters.
    pub fn fit(&self, points: &[FeatureVector]) -> Result<KMeansFit> {
        let k = self.config.n_clusters;

        if k == 0 || self.config.n_init == 0 || self.config.max_iterations == 0 {
            return Err(WordTierError::invalid_config(
                "k-means needs positive n_clusters, n_init and max_iterations",
            ));
        }

        if points.len() < k {
            return Err(WordTierError::EmptyPopulation {
                population: points.len(),
                required: k,
            });
        }

        if points.iter().flatten().any(|v| !v.is_finite()) {
            return Err(WordTierError::other(
                "Cannot cluster feature vectors containing NaN or infinity",
            ));
        }

        let distinct = count_distinct(points);
        if distinct < k {
            return Err(WordTierError::InsufficientDistinctPoints {
                distinct,
                required: k,
            });
        }

        let tolerance = self.config.tolerance * mean_variance(points);
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let mut best: Option<KMeansFit> = None;
        for _ in 0..self.config.n_init {
            let fit = self.fit_once(points, &mut rng, tolerance);
            if best.as_ref().is_none_or(|b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }

        best.ok_or_else(|| WordTierError::other("k-means produced no result"))
    }

    /// One initialization followed by Lloyd iterations.
    fn fit_once(&self, points: &[FeatureVector], rng: &mut StdRng, tolerance: f64) -> KMeansFit {
        let mut centroids = init_centroids_kmeans_plus_plus(points, self.config.n_clusters, rng);
        let mut labels: Vec<usize> = Vec::new();
        let mut iterations = 0;

        for iteration in 0..self.config.max_iterations {
            iterations = iteration + 1;

            let (new_labels, _) = assign(points, &centroids);
            let stable = new_labels == labels;
            labels = new_labels;

            let new_centroids = update_centroids(points, &labels, &centroids);
            let shift: f64 = centroids
                .iter()
                .zip(new_centroids.iter())
                .map(|(old, new)| squared_distance(old, new))
                .sum();
            centroids = new_centroids;

            if stable || shift <= tolerance {
                break;
            }
        }

        let (labels, inertia) = assign(points, &centroids);

        KMeansFit {
            labels,
            centroids,
            inertia,
            iterations,
        }
    }
}

/// Mean over dimensions of the per-dimension population variance.
fn mean_variance(points: &[FeatureVector]) -> f64 {
    let n = points.len() as f64;
    let dims = 3;
    let mut total = 0.0;

    for d in 0..dims {
        let mean = points.iter().map(|p| p[d]).sum::<f64>() / n;
        total += points.iter().map(|p| (p[d] - mean).powi(2)).sum::<f64>() / n;
    }

    total / dims as f64
}

/// Choose initial centroids with k-means++.
fn init_centroids_kmeans_plus_plus(
    points: &[FeatureVector],
    k: usize,
    rng: &mut StdRng,
) -> Vec<FeatureVector> {
    let mut centroids = Vec::with_capacity(k);

    let first = rng.random_range(0..points.len());
    centroids.push(points[first]);

    let mut closest: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = closest.iter().sum();

        let next = if total <= 0.0 {
            rng.random_range(0..points.len())
        } else {
            // Sample proportionally to squared distance. Points already
            // covered by a centroid have zero weight and are never chosen.
            let target = rng.random::<f64>() * total;
            let mut cumsum = 0.0;
            let mut chosen = None;
            let mut last_positive = 0;

            for (i, &weight) in closest.iter().enumerate() {
                if weight <= 0.0 {
                    continue;
                }
                last_positive = i;
                cumsum += weight;
                if cumsum >= target {
                    chosen = Some(i);
                    break;
                }
            }

            chosen.unwrap_or(last_positive)
        };

        let centroid = points[next];
        for (distance, point) in closest.iter_mut().zip(points) {
            *distance = distance.min(squared_distance(point, &centroid));
        }
        centroids.push(centroid);
    }

    centroids
}

/// Assign every point to its nearest centroid; ties go to the lower id.
fn assign(points: &[FeatureVector], centroids: &[FeatureVector]) -> (Vec<usize>, f64) {
    let mut inertia = 0.0;

    let labels = points
        .iter()
        .map(|point| {
            let mut best_cluster = 0;
            let mut best_distance = f64::INFINITY;

            for (i, centroid) in centroids.iter().enumerate() {
                let distance = squared_distance(point, centroid);
                if distance < best_distance {
                    best_distance = distance;
                    best_cluster = i;
                }
            }

            inertia += best_distance;
            best_cluster
        })
        .collect();

    (labels, inertia)
}

/// Recompute centroids as cluster means.
///
/// An empty cluster is moved onto the point that lies farthest from its
/// current centroid, so every cluster keeps at least one candidate member.
fn update_centroids(
    points: &[FeatureVector],
    labels: &[usize],
    centroids: &[FeatureVector],
) -> Vec<FeatureVector> {
    let k = centroids.len();
    let mut sums = vec![[0.0; 3]; k];
    let mut counts = vec![0usize; k];

    for (point, &label) in points.iter().zip(labels) {
        counts[label] += 1;
        for (sum, value) in sums[label].iter_mut().zip(point) {
            *sum += value;
        }
    }

    let mut updated: Vec<FeatureVector> = sums
        .iter()
        .zip(counts.iter())
        .zip(centroids.iter())
        .map(|((sum, &count), old)| {
            if count == 0 {
                *old
            } else {
                sum.map(|s| s / count as f64)
            }
        })
        .collect();

    let empty: Vec<usize> = (0..k).filter(|&c| counts[c] == 0).collect();
    if !empty.is_empty() {
        let mut by_distance: Vec<(usize, f64)> = points
            .iter()
            .zip(labels)
            .enumerate()
            .map(|(i, (point, &label))| (i, squared_distance(point, &centroids[label])))
            .collect();
        by_distance.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        for (cluster, (index, _)) in empty.into_iter().zip(by_distance) {
            updated[cluster] = points[index];
        }
    }

    updated
}
