//! Configuration for the clustering engine.

use serde::{Deserialize, Serialize};

use crate::clustering::kmeans::KMeansConfig;
use crate::error::{Result, WordTierError};
use crate::record::NUM_CLUSTERS;

/// Configuration for grid search and final clustering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// A candidate must score strictly above this silhouette to be selected.
    pub min_score: f64,

    /// Seed shared by every k-means run.
    pub seed: u64,

    /// Iteration cap for a single k-means run.
    pub max_iterations: usize,

    /// Convergence tolerance, relative to the mean feature variance.
    pub tolerance: f64,

    /// Number of k-means initializations; the lowest inertia wins.
    pub n_init: usize,

    /// Thread pool size for candidate evaluation.
    /// If None, uses the number of CPU cores.
    pub thread_pool_size: Option<usize>,

    /// Compute the silhouette on a seeded sample of this many words.
    /// If None, the exact silhouette over every word is used.
    pub silhouette_sample_size: Option<usize>,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            min_score: 0.5,
            seed: 42,
            max_iterations: 300,
            tolerance: 1e-4,
            n_init: 10,
            thread_pool_size: None,
            silhouette_sample_size: None,
        }
    }
}

impl ClusteringConfig {
    /// Set the minimum quality score.
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    /// Set the k-means seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of k-means initializations.
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Set the thread pool size.
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    /// Set the silhouette sample size.
    pub fn with_silhouette_sample_size(mut self, size: usize) -> Self {
        self.silhouette_sample_size = Some(size);
        self
    }

    /// k-means settings derived from this configuration.
    pub fn kmeans_config(&self) -> KMeansConfig {
        KMeansConfig {
            n_clusters: NUM_CLUSTERS,
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
            n_init: self.n_init,
            seed: self.seed,
        }
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.min_score.is_finite() || !(-1.0..1.0).contains(&self.min_score) {
            return Err(WordTierError::invalid_config(format!(
                "min_score must be in [-1, 1), got {}",
                self.min_score
            )));
        }
        if self.max_iterations == 0 {
            return Err(WordTierError::invalid_config("max_iterations must be positive"));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(WordTierError::invalid_config(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        if self.n_init == 0 {
            return Err(WordTierError::invalid_config("n_init must be positive"));
        }
        if self.thread_pool_size == Some(0) {
            return Err(WordTierError::invalid_config("thread_pool_size must be positive"));
        }
        if let Some(size) = self.silhouette_sample_size
            && size <= NUM_CLUSTERS
        {
            return Err(WordTierError::invalid_config(format!(
                "silhouette_sample_size must exceed {NUM_CLUSTERS}, got {size}"
            )));
        }
        Ok(())
    }
}
