//! Error types for the wordtier library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`WordTierError`] enum. Structural failures (missing input, an empty
//! population, a grid search with no acceptable weighting) abort the run and
//! carry enough context to diagnose them. Per-word problems never reach this
//! type; they degrade to documented defaults where they occur.
//!
//! # Examples
//!
//! ```
//! use wordtier::error::{Result, WordTierError};
//!
//! fn cluster(population: usize) -> Result<()> {
//!     if population < 3 {
//!         return Err(WordTierError::EmptyPopulation { population, required: 3 });
//!     }
//!     Ok(())
//! }
//!
//! assert!(cluster(2).is_err());
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The main error type for wordtier operations.
#[derive(Error, Debug)]
pub enum WordTierError {
    /// The source word table could not be read.
    #[error("Input unavailable: {}: {reason}", .path.display())]
    InputUnavailable { path: PathBuf, reason: String },

    /// The grid search found no weighting that satisfies the dominance
    /// constraint and exceeds the minimum quality score.
    #[error(
        "No acceptable weighting found: population={population}, threshold={threshold}, best_score={}, candidates_evaluated={candidates_evaluated}",
        format_score(.best_score)
    )]
    NoAcceptableWeighting {
        population: usize,
        threshold: f64,
        best_score: Option<f64>,
        candidates_evaluated: usize,
    },

    /// Clustering was requested on too few words.
    #[error("Empty population: {population} words, at least {required} required")]
    EmptyPopulation { population: usize, required: usize },

    /// The feature vectors do not contain enough distinct points to form
    /// the requested number of clusters.
    #[error("Insufficient distinct points: {distinct} distinct, {required} required")]
    InsufficientDistinctPoints { distinct: usize, required: usize },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Operation cancelled
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

fn format_score(score: &Option<f64>) -> String {
    match score {
        Some(score) => format!("{score:.4}"),
        None => "none".to_string(),
    }
}

/// Result type alias for operations that may fail with WordTierError.
pub type Result<T> = std::result::Result<T, WordTierError>;

impl WordTierError {
    /// Create a new input-unavailable error.
    pub fn input_unavailable<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        WordTierError::InputUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        WordTierError::InvalidConfig(msg.into())
    }

    /// Create a new cancelled error.
    pub fn cancelled<S: Into<String>>(msg: S) -> Self {
        WordTierError::Cancelled(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        WordTierError::Other(msg.into())
    }

    /// Process exit code for this error: 2 for structural failures, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_structural() { 2 } else { 1 }
    }

    /// Whether this error aborts the run rather than a single word.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            WordTierError::InputUnavailable { .. }
                | WordTierError::NoAcceptableWeighting { .. }
                | WordTierError::EmptyPopulation { .. }
                | WordTierError::InsufficientDistinctPoints { .. }
        )
    }
}
