//! Final clustering and rank canonicalization.
//!
//! k-means cluster ids are arbitrary. Right after the final run they are
//! translated into rank labels ordered by mean real-world frequency (log),
//! highest first, and nothing downstream looks at the raw ids again.

use log::{debug, info};

use crate::clustering::config::ClusteringConfig;
use crate::clustering::kmeans::KMeans;
use crate::clustering::weights::{WeightTriple, weighted_composite};
use crate::error::{Result, WordTierError};
use crate::features::standardize::StandardizedSignals;
use crate::record::{NUM_CLUSTERS, RankLabel, WordRecord};

/// Mapping from raw cluster id to rank label for one clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAssignment {
    /// Rank of each raw cluster, indexed by raw id.
    ranks: Vec<RankLabel>,
    /// Mean log real-world frequency of each rank, indexed by rank.
    rank_means: Vec<Option<f64>>,
}

impl ClusterAssignment {
    /// Build the mapping from raw labels and each word's log real-world frequency.
    ///
    /// Clusters are sorted by descending mean; equal means keep raw id order.
    /// A cluster without members sorts last.
    pub fn from_clusters(raw_labels: &[usize], real_world_log: &[f64], n_clusters: usize) -> Result<Self> {
        if raw_labels.len() != real_world_log.len() {
            return Err(WordTierError::other(format!(
                "Label count {} does not match frequency count {}",
                raw_labels.len(),
                real_world_log.len()
            )));
        }
        if n_clusters > NUM_CLUSTERS {
            return Err(WordTierError::invalid_config(format!(
                "Cannot rank {n_clusters} clusters, at most {NUM_CLUSTERS} are supported"
            )));
        }

        let mut sums = vec![0.0; n_clusters];
        let mut counts = vec![0usize; n_clusters];
        for (&label, &value) in raw_labels.iter().zip(real_world_log) {
            if label >= n_clusters {
                return Err(WordTierError::other(format!(
                    "Raw cluster id {label} out of range for {n_clusters} clusters"
                )));
            }
            sums[label] += value;
            counts[label] += 1;
        }

        let means: Vec<Option<f64>> = sums
            .iter()
            .zip(&counts)
            .map(|(sum, &count)| (count > 0).then(|| sum / count as f64))
            .collect();

        let mut order: Vec<usize> = (0..n_clusters).collect();
        order.sort_by(|&a, &b| {
            let a = means[a].unwrap_or(f64::NEG_INFINITY);
            let b = means[b].unwrap_or(f64::NEG_INFINITY);
            b.total_cmp(&a)
        });

        let mut ranks = vec![RankLabel::EASY; n_clusters];
        let mut rank_means = vec![None; n_clusters];
        for (rank, &raw) in order.iter().enumerate() {
            // rank < n_clusters <= NUM_CLUSTERS, so the label always exists
            ranks[raw] = RankLabel::new(rank as u8)
                .ok_or_else(|| WordTierError::other(format!("Invalid rank {rank}")))?;
            rank_means[rank] = means[raw];
        }

        Ok(ClusterAssignment { ranks, rank_means })
    }

    /// Rank label of a raw cluster id.
    pub fn rank_of(&self, raw: usize) -> Option<RankLabel> {
        self.ranks.get(raw).copied()
    }

    /// Mean log real-world frequency of a rank, `None` if it has no members.
    pub fn mean_for_rank(&self, rank: RankLabel) -> Option<f64> {
        self.rank_means.get(rank.value() as usize).copied().flatten()
    }

    /// Number of clusters covered by this mapping.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

/// Cluster the records under the chosen weights and assign rank labels.
///
/// Fills in each record's composite, raw cluster id and rank label.
pub fn run_final_kmeans(
    records: &mut [WordRecord],
    weights: &WeightTriple,
    config: &ClusteringConfig,
) -> Result<ClusterAssignment> {
    if records.len() < NUM_CLUSTERS {
        return Err(WordTierError::EmptyPopulation {
            population: records.len(),
            required: NUM_CLUSTERS,
        });
    }
    if !weights.is_valid() {
        return Err(WordTierError::invalid_config(format!(
            "Invalid weights: {weights}"
        )));
    }

    let signals: Vec<StandardizedSignals> = records.iter().map(|r| r.standardized).collect();
    let composite = weighted_composite(&signals, weights);

    let fit = KMeans::new(config.kmeans_config()).fit(&composite)?;
    debug!(
        "Final k-means converged in {} iterations (inertia {:.4})",
        fit.iterations, fit.inertia
    );

    let real_world_log: Vec<f64> = records.iter().map(|r| r.real_world_log).collect();
    let assignment = ClusterAssignment::from_clusters(&fit.labels, &real_world_log, NUM_CLUSTERS)?;

    for ((record, vector), &raw) in records.iter_mut().zip(composite).zip(&fit.labels) {
        record.composite = vector;
        record.raw_cluster = Some(raw);
        record.rank = assignment.rank_of(raw);
    }

    info!("Final clustering with {weights} assigned {} words", records.len());

    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_sorted_by_descending_mean() {
        let raw_labels = vec![0, 1, 2, 0, 1, 2];
        let real_world_log = vec![-10.0, -2.0, -6.0, -12.0, -3.0, -5.0];

        let assignment = ClusterAssignment::from_clusters(&raw_labels, &real_world_log, 3).unwrap();
        assert_eq!(assignment.rank_of(1), Some(RankLabel::EASY));
        assert_eq!(assignment.rank_of(2), Some(RankLabel::MEDIUM));
        assert_eq!(assignment.rank_of(0), Some(RankLabel::HARD));
        assert_eq!(assignment.mean_for_rank(RankLabel::EASY), Some(-2.5));
        assert_eq!(assignment.mean_for_rank(RankLabel::HARD), Some(-11.0));
        assert_eq!(assignment.rank_of(3), None);
    }

    #[test]
    fn test_empty_cluster_ranks_last() {
        let raw_labels = vec![2, 0, 2];
        let real_world_log = vec![-1.0, -20.0, -3.0];

        let assignment = ClusterAssignment::from_clusters(&raw_labels, &real_world_log, 3).unwrap();
        assert_eq!(assignment.rank_of(2), Some(RankLabel::EASY));
        assert_eq!(assignment.rank_of(0), Some(RankLabel::MEDIUM));
        assert_eq!(assignment.rank_of(1), Some(RankLabel::HARD));
        assert_eq!(assignment.mean_for_rank(RankLabel::HARD), None);
    }

    #[test]
    fn test_tied_means_keep_raw_order() {
        let assignment = ClusterAssignment::from_clusters(&[0, 1, 2], &[-4.0, -4.0, -1.0], 3).unwrap();
        assert_eq!(assignment.rank_of(2), Some(RankLabel::EASY));
        assert_eq!(assignment.rank_of(0), Some(RankLabel::MEDIUM));
        assert_eq!(assignment.rank_of(1), Some(RankLabel::HARD));
    }

    #[test]
    fn test_mismatched_input() {
        assert!(ClusterAssignment::from_clusters(&[0, 1], &[-1.0], 3).is_err());
        assert!(ClusterAssignment::from_clusters(&[0, 5], &[-1.0, -2.0], 3).is_err());
        assert!(ClusterAssignment::from_clusters(&[0], &[-1.0], 4).is_err());
    }
}
