//! Builds word records with raw and standardized signals.

use std::sync::Arc;

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::features::spelling::SpellingSignals;
use crate::features::standardize::standardize_population;
use crate::frequency::{DEFAULT_LOG_FLOOR, FrequencySource, log_frequency};
use crate::lexicon::normalize::NormalizedWord;
use crate::record::WordRecord;

/// Configuration for feature computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Log value used when a lemma has no real-world frequency.
    pub log_floor: f64,
    /// Build records in parallel above this many words.
    pub parallel_threshold: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            log_floor: DEFAULT_LOG_FLOOR,
            parallel_threshold: 1000,
        }
    }
}

/// Computes the three signal groups for a population of words.
pub struct FeatureBuilder {
    config: FeatureConfig,
    frequency: Arc<dyn FrequencySource>,
}

impl std::fmt::Debug for FeatureBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureBuilder")
            .field("config", &self.config)
            .field("frequency", &self.frequency.name())
            .finish()
    }
}

impl FeatureBuilder {
    /// Create a new feature builder.
    pub fn new(config: FeatureConfig, frequency: Arc<dyn FrequencySource>) -> Self {
        FeatureBuilder { config, frequency }
    }

    /// Compute the raw signals of one word.
    pub fn build_record(&self, word: &NormalizedWord) -> WordRecord {
        let found = self.frequency.frequency(&word.lemma);
        let real_world_frequency = found.filter(|f| f.is_finite() && *f > 0.0).unwrap_or(0.0);

        WordRecord::new(
            word.word.clone(),
            word.lemma.clone(),
            word.corpus_frequency,
            real_world_frequency,
            log_frequency(found, self.config.log_floor),
            SpellingSignals::from_lemma(&word.lemma),
        )
    }

    /// Build records for the whole population and standardize them together.
    pub fn build(&self, words: &[NormalizedWord]) -> Vec<WordRecord> {
        let mut records: Vec<WordRecord> = if words.len() > self.config.parallel_threshold {
            words.par_iter().map(|w| self.build_record(w)).collect()
        } else {
            words.iter().map(|w| self.build_record(w)).collect()
        };

        let unknown = records
            .iter()
            .filter(|r| r.real_world_frequency == 0.0)
            .count();
        if unknown > 0 {
            debug!(
                "{unknown} of {} lemmas have no real-world frequency; using log floor {}",
                records.len(),
                self.config.log_floor
            );
        }

        standardize_population(&mut records);
        info!(
            "Built features for {} words using the {} frequency source",
            records.len(),
            self.frequency.name()
        );

        records
    }
}
