//! Word records and rank labels.
//!
//! A [`WordRecord`] is created by the feature builder, enriched in place by the
//! clustering engine and read by the exporter. The raw cluster id assigned by
//! k-means is kept crate-private: callers only ever see the [`RankLabel`]
//! produced by rank canonicalization.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clustering::weights::FeatureVector;
use crate::features::spelling::SpellingSignals;
use crate::features::standardize::StandardizedSignals;

/// Number of clusters the engine partitions words into.
pub const NUM_CLUSTERS: usize = 3;

/// Canonical, frequency-ordered cluster identity.
///
/// Rank 0 is the cluster with the highest mean real-world frequency (the
/// most familiar words), rank 2 the lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankLabel(u8);

impl RankLabel {
    /// Most familiar words.
    pub const EASY: RankLabel = RankLabel(0);
    /// Middle tier.
    pub const MEDIUM: RankLabel = RankLabel(1);
    /// Least familiar words.
    pub const HARD: RankLabel = RankLabel(2);

    /// Create a rank label, returning `None` outside `0..NUM_CLUSTERS`.
    pub fn new(value: u8) -> Option<Self> {
        if (value as usize) < NUM_CLUSTERS {
            Some(RankLabel(value))
        } else {
            None
        }
    }

    /// Numeric value of the label.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// All labels in ascending order.
    pub fn all() -> [RankLabel; NUM_CLUSTERS] {
        [RankLabel::EASY, RankLabel::MEDIUM, RankLabel::HARD]
    }

    /// Human-facing difficulty tier for this label.
    pub fn difficulty(&self) -> Difficulty {
        match self.0 {
            0 => Difficulty::Easy,
            1 => Difficulty::Medium,
            _ => Difficulty::Hard,
        }
    }
}

impl fmt::Display for RankLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Difficulty tier attached to a rank label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Get the name of this tier.
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// One candidate word and everything computed about it during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct WordRecord {
    /// Canonical uppercase word.
    pub word: String,
    /// Dictionary base form of the word.
    pub lemma: String,
    /// Usage count from the source word table.
    pub corpus_frequency: f64,
    /// Relative real-world frequency of the lemma (0 when unknown).
    pub real_world_frequency: f64,
    /// Log-transformed real-world frequency, floored for unknown words.
    pub real_world_log: f64,
    /// Raw spelling sub-signals computed from the lemma.
    pub spelling: SpellingSignals,
    /// Population-standardized signal scores.
    pub standardized: StandardizedSignals,
    /// Weighted composite used for the final clustering.
    pub composite: FeatureVector,
    /// Arbitrary id returned by k-means. Never exported.
    pub(crate) raw_cluster: Option<usize>,
    /// Final rank label after canonicalization.
    pub rank: Option<RankLabel>,
}

impl WordRecord {
    /// Create a record with raw signals; derived fields start empty.
    pub fn new(
        word: impl Into<String>,
        lemma: impl Into<String>,
        corpus_frequency: f64,
        real_world_frequency: f64,
        real_world_log: f64,
        spelling: SpellingSignals,
    ) -> Self {
        WordRecord {
            word: word.into(),
            lemma: lemma.into(),
            corpus_frequency,
            real_world_frequency,
            real_world_log,
            spelling,
            standardized: StandardizedSignals::default(),
            composite: [0.0; 3],
            raw_cluster: None,
            rank: None,
        }
    }

    /// Difficulty tier of this word, once ranked.
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.rank.map(|rank| rank.difficulty())
    }
}

/// Group ranked words by label, preserving input order within each label.
///
/// Every label is present in the result, possibly with an empty list.
/// Records without a rank are skipped.
pub fn partition_by_rank(records: &[WordRecord]) -> BTreeMap<RankLabel, Vec<String>> {
    let mut partition: BTreeMap<RankLabel, Vec<String>> =
        RankLabel::all().into_iter().map(|label| (label, Vec::new())).collect();

    for record in records {
        if let Some(rank) = record.rank {
            partition.entry(rank).or_default().push(record.word.clone());
        }
    }

    partition
}

/// Count ranked records per label, including labels with no members.
pub fn count_by_rank(records: &[WordRecord]) -> BTreeMap<RankLabel, usize> {
    let mut counts: BTreeMap<RankLabel, usize> =
        RankLabel::all().into_iter().map(|label| (label, 0)).collect();

    for rank in records.iter().filter_map(|record| record.rank) {
        *counts.entry(rank).or_default() += 1;
    }

    counts
}
