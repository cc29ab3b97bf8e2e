//! Weight triples, the search grid and the weighted composite builder.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::features::standardize::StandardizedSignals;

/// A weighted composite: `[w_sub * F, w_real * R, w_spell * S]`.
pub type FeatureVector = [f64; 3];

/// Number of grid values per weight (0.1 through 1.0).
pub const GRID_STEPS: u32 = 10;

/// Relative influence of the three signal groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightTriple {
    /// Corpus (submission) frequency weight.
    pub submission: f64,
    /// Real-world frequency weight.
    pub real_world: f64,
    /// Spelling easiness weight.
    pub spelling: f64,
}

impl WeightTriple {
    /// Create a new weight triple.
    pub fn new(submission: f64, real_world: f64, spelling: f64) -> Self {
        WeightTriple {
            submission,
            real_world,
            spelling,
        }
    }

    /// Whether real-world frequency strictly outweighs both other groups.
    pub fn is_dominant(&self) -> bool {
        self.real_world > self.submission && self.real_world > self.spelling
    }

    /// Whether every weight is a finite, non-negative number.
    pub fn is_valid(&self) -> bool {
        [self.submission, self.real_world, self.spelling]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0)
    }

    /// Weight one word's standardized signals.
    pub fn apply(&self, signals: &StandardizedSignals) -> FeatureVector {
        [
            self.submission * signals.frequency,
            self.real_world * signals.real_world,
            self.spelling * signals.spelling,
        ]
    }
}

impl fmt::Display for WeightTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "submission={:.1}, real_world={:.1}, spelling={:.1}",
            self.submission, self.real_world, self.spelling
        )
    }
}

/// Build the weighted composite for every word.
///
/// Returns a fresh table; the standardized input is never modified.
pub fn weighted_composite(
    signals: &[StandardizedSignals],
    weights: &WeightTriple,
) -> Vec<FeatureVector> {
    signals.iter().map(|s| weights.apply(s)).collect()
}

/// The discrete search space: each weight in {0.1, 0.2, ..., 1.0}.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightGrid;

impl WeightGrid {
    /// Grid value for a step in `1..=GRID_STEPS`.
    fn value(step: u32) -> f64 {
        step as f64 / GRID_STEPS as f64
    }

    /// Every triple, ascending by submission, then real-world, then spelling.
    pub fn all(&self) -> impl Iterator<Item = WeightTriple> {
        (1..=GRID_STEPS).flat_map(|sub| {
            (1..=GRID_STEPS).flat_map(move |real| {
                (1..=GRID_STEPS).map(move |spell| {
                    WeightTriple::new(Self::value(sub), Self::value(real), Self::value(spell))
                })
            })
        })
    }

    /// Triples that satisfy the dominance constraint, in enumeration order.
    pub fn candidates(&self) -> Vec<WeightTriple> {
        self.all().filter(WeightTriple::is_dominant).collect()
    }
}
