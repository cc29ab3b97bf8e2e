//! Weighted clustering engine: grid search, final clustering and ranking.

use std::collections::BTreeMap;

use log::info;
use serde::{Deserialize, Serialize};

use crate::clustering::config::ClusteringConfig;
use crate::clustering::grid_search::{CancellationToken, CandidateScore, GridSearch, GridSearchResult};
use crate::clustering::ranking::{ClusterAssignment, run_final_kmeans};
use crate::clustering::weights::WeightTriple;
use crate::error::{Result, WordTierError};
use crate::features::standardize::StandardizedSignals;
use crate::record::{NUM_CLUSTERS, RankLabel, WordRecord, count_by_rank, partition_by_rank};

/// Summary of a clustering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringSummary {
    pub num_clusters: usize,
    /// Words per rank label, every label present.
    pub cluster_counts: BTreeMap<RankLabel, usize>,
    pub weights: WeightTriple,
    pub quality_score: f64,
    pub population: usize,
}

/// Everything a clustering run produces besides the annotated records.
#[derive(Debug, Clone)]
pub struct ClusteringOutcome {
    pub search: GridSearchResult,
    pub assignment: ClusterAssignment,
    pub summary: ClusteringSummary,
}

impl ClusteringOutcome {
    /// Mean log real-world frequency per rank, `None` for empty ranks.
    pub fn rank_means(&self) -> BTreeMap<RankLabel, Option<f64>> {
        RankLabel::all()
            .into_iter()
            .map(|label| (label, self.assignment.mean_for_rank(label)))
            .collect()
    }
}

fn signals_of(records: &[WordRecord]) -> Vec<StandardizedSignals> {
    records.iter().map(|r| r.standardized).collect()
}

/// Finds the best signal weighting and tiers the population with it.
#[derive(Debug)]
pub struct ClusteringEngine {
    search: GridSearch,
}

impl ClusteringEngine {
    /// Create a new engine.
    pub fn new(config: ClusteringConfig) -> Result<Self> {
        Ok(ClusteringEngine {
            search: GridSearch::new(config)?,
        })
    }

    /// Use an externally owned cancellation token for the grid search.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.search = self.search.with_cancellation(token);
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClusteringConfig {
        self.search.config()
    }

    /// Run the grid search only.
    pub fn search(&self, records: &[WordRecord]) -> Result<GridSearchResult> {
        self.search.run(&signals_of(records))
    }

    /// Run the grid search, keeping every candidate's score.
    pub fn search_with_scores(
        &self,
        records: &[WordRecord],
    ) -> Result<(GridSearchResult, Vec<CandidateScore>)> {
        self.search.run_with_scores(&signals_of(records))
    }

    /// Search, cluster with the winning weights and rank the clusters.
    ///
    /// Records must already carry standardized signals. On success every
    /// record has a rank label.
    pub fn cluster(&self, records: &mut [WordRecord]) -> Result<ClusteringOutcome> {
        let search = self.search(records)?;
        let assignment = run_final_kmeans(records, &search.weights, self.config())?;

        let mislabeled = records
            .iter()
            .filter(|r| {
                r.raw_cluster
                    .and_then(|raw| assignment.rank_of(raw))
                    .is_none_or(|rank| r.rank != Some(rank))
            })
            .count();
        if mislabeled > 0 {
            return Err(WordTierError::other(format!(
                "Final clustering left {mislabeled} words without a consistent rank"
            )));
        }

        let summary = ClusteringSummary {
            num_clusters: NUM_CLUSTERS,
            cluster_counts: count_by_rank(records),
            weights: search.weights,
            quality_score: search.score,
            population: records.len(),
        };

        for (label, words) in partition_by_rank(records) {
            info!(
                "Rank {} ({}): {} words",
                label,
                label.difficulty().name(),
                words.len()
            );
        }

        Ok(ClusteringOutcome {
            search,
            assignment,
            summary,
        })
    }
}
