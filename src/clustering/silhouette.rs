//! Silhouette coefficient of a partition.
//!
//! For a point with mean intra-cluster distance `a` and mean distance `b` to
//! the nearest other cluster, the silhouette is `(b - a) / max(a, b)`. Points
//! alone in their cluster score 0. The coefficient is the mean over points and
//! is only defined when the number of clusters is between 2 and `n - 1`.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use rayon::prelude::*;

use crate::clustering::kmeans::euclidean_distance;
use crate::clustering::weights::FeatureVector;

/// Above this many points the per-point loop runs on the rayon pool.
const PARALLEL_THRESHOLD: usize = 2048;

/// Silhouette value of every point, or `None` when undefined.
pub fn silhouette_samples(points: &[FeatureVector], labels: &[usize]) -> Option<Vec<f64>> {
    let n = points.len();
    if n != labels.len() || n < 3 {
        return None;
    }

    let n_clusters = labels.iter().max().map_or(0, |max| max + 1);
    let mut sizes = vec![0usize; n_clusters];
    for &label in labels {
        sizes[label] += 1;
    }

    let populated = sizes.iter().filter(|&&size| size > 0).count();
    if populated < 2 || populated > n - 1 {
        return None;
    }

    let sample = |i: usize| -> f64 {
        let own = labels[i];
        if sizes[own] <= 1 {
            return 0.0;
        }

        let mut sums = vec![0.0; n_clusters];
        for (j, point) in points.iter().enumerate() {
            if j != i {
                sums[labels[j]] += euclidean_distance(&points[i], point);
            }
        }

        let a = sums[own] / (sizes[own] - 1) as f64;
        let b = (0..n_clusters)
            .filter(|&c| c != own && sizes[c] > 0)
            .map(|c| sums[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);

        let denominator = a.max(b);
        if denominator > 0.0 {
            (b - a) / denominator
        } else {
            0.0
        }
    };

    let samples = if n > PARALLEL_THRESHOLD {
        (0..n).into_par_iter().map(sample).collect()
    } else {
        (0..n).map(sample).collect()
    };

    Some(samples)
}

/// Mean silhouette over every point, or `None` when undefined.
pub fn silhouette_score(points: &[FeatureVector], labels: &[usize]) -> Option<f64> {
    let samples = silhouette_samples(points, labels)?;
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Silhouette over a seeded random sample of the points.
///
/// Falls back to the exact score when the sample would cover everything.
/// The same seed always selects the same points.
pub fn sampled_silhouette_score(
    points: &[FeatureVector],
    labels: &[usize],
    sample_size: usize,
    seed: u64,
) -> Option<f64> {
    if sample_size >= points.len() {
        return silhouette_score(points, labels);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices = index::sample(&mut rng, points.len(), sample_size).into_vec();
    indices.sort_unstable();

    let sampled_points: Vec<FeatureVector> = indices.iter().map(|&i| points[i]).collect();
    let sampled_labels: Vec<usize> = indices.iter().map(|&i| labels[i]).collect();

    silhouette_score(&sampled_points, &sampled_labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_separated_clusters_score_high() {
        let points = vec![
            [0.0, 0.0, 0.0],
            [0.1, 0.0, 0.0],
            [10.0, 0.0, 0.0],
            [10.1, 0.0, 0.0],
            [20.0, 0.0, 0.0],
            [20.1, 0.0, 0.0],
        ];
        let labels = vec![0, 0, 1, 1, 2, 2];

        let score = silhouette_score(&points, &labels).unwrap();
        assert!(score > 0.95);
        assert!(score <= 1.0);
    }

    #[test]
    fn test_known_value() {
        // Point 0: a = 1, b = mean(4, 5) = 4.5 -> 7/9
        // Point 1: a = 1, b = mean(3, 4) = 3.5 -> 5/7
        // Point 2: a = 1, b = mean(3, 4) = 3.5 -> 5/7
        // Point 3: a = 1, b = mean(4, 5) = 4.5 -> 7/9
        let points = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [4.0, 0.0, 0.0], [5.0, 0.0, 0.0]];
        let labels = vec![0, 0, 1, 1];

        let expected = (7.0 / 9.0 + 5.0 / 7.0) / 2.0;
        let score = silhouette_score(&points, &labels).unwrap();
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_singleton_cluster_scores_zero() {
        let points = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [9.0, 0.0, 0.0]];
        let labels = vec![0, 0, 1];

        let samples = silhouette_samples(&points, &labels).unwrap();
        assert_eq!(samples[2], 0.0);
    }

    #[test]
    fn test_undefined_partitions() {
        let points = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        assert!(silhouette_score(&points, &[0, 0, 0]).is_none());
        assert!(silhouette_score(&points, &[0, 1, 2]).is_none());
        assert!(silhouette_score(&points, &[0, 1]).is_none());
    }

    #[test]
    fn test_sampled_score_is_deterministic() {
        let points: Vec<FeatureVector> = (0..60)
            .map(|i| [(i % 3) as f64 * 10.0 + (i as f64) * 0.01, 0.0, 0.0])
            .collect();
        let labels: Vec<usize> = (0..60).map(|i| i % 3).collect();

        let first = sampled_silhouette_score(&points, &labels, 20, 7).unwrap();
        let second = sampled_silhouette_score(&points, &labels, 20, 7).unwrap();
        assert_eq!(first, second);
        assert!(first > 0.9);

        let exact = sampled_silhouette_score(&points, &labels, 100, 7).unwrap();
        assert_eq!(exact, silhouette_score(&points, &labels).unwrap());
    }
}
