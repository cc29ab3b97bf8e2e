//! # wordtier
//!
//! Tiers English words into easy, medium and hard by how familiar they are.
//!
//! ## Features
//!
//! - Three independently standardized signal groups: corpus frequency,
//!   real-world frequency and spelling easiness
//! - Parallel grid search over signal weightings, scored by silhouette
//! - Seeded k-means with clusters ranked by real-world frequency
//! - Lexicon and blocklist filtering before export
//!
//! ## Example
//!
//! ```no_run
//! use wordtier::config::PipelineConfig;
//! use wordtier::pipeline::Pipeline;
//!
//! let config = PipelineConfig::new("data/words.csv", "output")
//!     .with_frequency_file("data/frequencies.txt");
//! let report = Pipeline::new(config)?.run()?;
//! println!("Best weights: {}", report.summary.weights);
//! # Ok::<(), wordtier::error::WordTierError>(())
//! ```

pub mod cli;
pub mod clustering;
pub mod config;
pub mod error;
pub mod features;
pub mod frequency;
pub mod io;
pub mod lexicon;
pub mod pipeline;
pub mod record;

pub mod prelude {
    pub use crate::clustering::{ClusteringConfig, ClusteringEngine, GridSearch, WeightTriple};
    pub use crate::config::PipelineConfig;
    pub use crate::error::{Result, WordTierError};
    pub use crate::pipeline::{Pipeline, Resources};
    pub use crate::record::{Difficulty, RankLabel, WordRecord};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
