//! Grid search over signal weightings.
//!
//! Every dominance-satisfying weight triple is scored independently on a
//! dedicated rayon pool: build the weighted composite, run seeded k-means,
//! take the silhouette. The results come back in enumeration order and are
//! reduced sequentially, so the chosen weighting does not depend on how many
//! threads did the work.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

use crate::clustering::config::ClusteringConfig;
use crate::clustering::kmeans::KMeans;
use crate::clustering::silhouette::{sampled_silhouette_score, silhouette_score};
use crate::clustering::weights::{WeightGrid, WeightTriple, weighted_composite};
use crate::error::{Result, WordTierError};
use crate::features::standardize::StandardizedSignals;
use crate::record::NUM_CLUSTERS;

/// Cooperative cancellation signal shared with a running search.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Candidates not yet started are skipped.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Quality score of one candidate weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub weights: WeightTriple,
    /// Silhouette, or `None` if the candidate could not be clustered.
    pub score: Option<f64>,
}

/// Outcome of a successful grid search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSearchResult {
    /// Best weighting found.
    pub weights: WeightTriple,
    /// Silhouette achieved by the best weighting.
    pub score: f64,
    /// Number of candidates that passed the dominance constraint.
    pub candidates_evaluated: usize,
    /// Number of candidates that produced a score.
    pub candidates_scored: usize,
    /// Number of words clustered.
    pub population: usize,
    /// Wall-clock time of the search.
    pub duration_ms: u64,
}

/// Pick the best candidate: highest score strictly above `min_score`,
/// first one wins on ties.
pub fn select_best(scores: &[CandidateScore], min_score: f64) -> Option<CandidateScore> {
    scores.iter().fold(None, |best: Option<CandidateScore>, candidate| {
        let Some(score) = candidate.score else {
            return best;
        };
        if score <= min_score {
            return best;
        }
        match best {
            Some(current) if current.score.is_some_and(|s| score <= s) => Some(current),
            _ => Some(*candidate),
        }
    })
}

/// Grid-search weight selector.
pub struct GridSearch {
    /// Configuration for the search.
    config: ClusteringConfig,

    /// Thread pool for candidate evaluation.
    thread_pool: Arc<ThreadPool>,

    /// Checked before each candidate.
    cancellation: CancellationToken,
}

impl std::fmt::Debug for GridSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridSearch")
            .field("config", &self.config)
            .field("threads", &self.thread_pool.current_num_threads())
            .finish()
    }
}

impl GridSearch {
    /// Create a new grid search.
    pub fn new(config: ClusteringConfig) -> Result<Self> {
        config.validate()?;

        let thread_pool_size = config.thread_pool_size.unwrap_or_else(num_cpus::get);

        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(thread_pool_size)
            .thread_name(|i| format!("grid-search-{i}"))
            .build()
            .map_err(|e| WordTierError::other(format!("Failed to create thread pool: {e}")))?;

        Ok(Self {
            config,
            thread_pool: Arc::new(thread_pool),
            cancellation: CancellationToken::new(),
        })
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Token that cancels this search.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// Score a single weighting. `None` if it cannot be clustered.
    pub fn evaluate(&self, signals: &[StandardizedSignals], weights: &WeightTriple) -> Option<f64> {
        let composite = weighted_composite(signals, weights);

        let fit = match KMeans::new(self.config.kmeans_config()).fit(&composite) {
            Ok(fit) => fit,
            Err(e) => {
                debug!("Candidate {weights} could not be clustered: {e}");
                return None;
            }
        };

        let score = match self.config.silhouette_sample_size {
            Some(size) => sampled_silhouette_score(&composite, &fit.labels, size, self.config.seed),
            None => silhouette_score(&composite, &fit.labels),
        };

        debug!(
            "Candidate {weights}: silhouette {}",
            score.map_or_else(|| "undefined".to_string(), |s| format!("{s:.4}"))
        );

        score
    }

    /// Score every candidate in enumeration order.
    pub fn score_candidates(&self, signals: &[StandardizedSignals]) -> Result<Vec<CandidateScore>> {
        self.score_with(|weights| self.evaluate(signals, weights))
    }

    /// Map `evaluate` over the grid on the pool, skipping candidates once
    /// the token is set.
    fn score_with<F>(&self, evaluate: F) -> Result<Vec<CandidateScore>>
    where
        F: Fn(&WeightTriple) -> Option<f64> + Sync,
    {
        let candidates = WeightGrid.candidates();

        let scores: Vec<CandidateScore> = self.thread_pool.install(|| {
            candidates
                .par_iter()
                .map(|weights| {
                    let score = if self.cancellation.is_cancelled() {
                        None
                    } else {
                        evaluate(weights)
                    };
                    CandidateScore {
                        weights: *weights,
                        score,
                    }
                })
                .collect()
        });

        if self.cancellation.is_cancelled() {
            return Err(WordTierError::cancelled("grid search cancelled"));
        }

        Ok(scores)
    }

    /// Find the best weighting for the population.
    pub fn run(&self, signals: &[StandardizedSignals]) -> Result<GridSearchResult> {
        self.run_with_scores(signals).map(|(result, _)| result)
    }

    /// Like [`GridSearch::run`], also returning every candidate's score.
    pub fn run_with_scores(
        &self,
        signals: &[StandardizedSignals],
    ) -> Result<(GridSearchResult, Vec<CandidateScore>)> {
        let population = signals.len();
        if population < NUM_CLUSTERS {
            return Err(WordTierError::EmptyPopulation {
                population,
                required: NUM_CLUSTERS,
            });
        }

        let start = Instant::now();
        info!(
            "Grid search over {} words on {} threads",
            population,
            self.thread_pool.current_num_threads()
        );

        let scores = self.score_candidates(signals)?;
        let candidates_scored = scores.iter().filter(|c| c.score.is_some()).count();

        let Some(best) = select_best(&scores, self.config.min_score) else {
            let best_score = scores
                .iter()
                .filter_map(|c| c.score)
                .fold(None, |best: Option<f64>, s| Some(best.map_or(s, |b| b.max(s))));
            return Err(WordTierError::NoAcceptableWeighting {
                population,
                threshold: self.config.min_score,
                best_score,
                candidates_evaluated: scores.len(),
            });
        };

        let score = best
            .score
            .ok_or_else(|| WordTierError::other("selected candidate has no score"))?;

        info!("Best weights: {} (silhouette {score:.4})", best.weights);

        let result = GridSearchResult {
            weights: best.weights,
            score,
            candidates_evaluated: scores.len(),
            candidates_scored,
            population,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        Ok((result, scores))
    }
}
