//! Weighted-feature grid-search clustering.
//!
//! Standardized signals are combined under a weight triple, partitioned with
//! seeded k-means and scored by silhouette. The best dominance-satisfying
//! weighting is used for a final clustering whose clusters are then ranked
//! by mean real-world frequency.

pub mod config;
pub mod engine;
pub mod grid_search;
pub mod kmeans;
pub mod ranking;
pub mod silhouette;
pub mod weights;

pub use config::ClusteringConfig;
pub use engine::{ClusteringEngine, ClusteringOutcome, ClusteringSummary};
pub use grid_search::{CancellationToken, CandidateScore, GridSearch, GridSearchResult, select_best};
pub use kmeans::{KMeans, KMeansConfig, KMeansFit};
pub use ranking::{ClusterAssignment, run_final_kmeans};
pub use silhouette::{sampled_silhouette_score, silhouette_samples, silhouette_score};
pub use weights::{FeatureVector, WeightGrid, WeightTriple, weighted_composite};
