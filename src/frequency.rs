//! Real-world word frequency lookup.
//!
//! The clustering engine only needs a relative frequency per lemma. Where it
//! comes from is a [`FrequencySource`]; [`FrequencyTable`] is the file-backed
//! implementation used by the CLI.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::AHashMap;
use log::{debug, warn};

use crate::error::{Result, WordTierError};

/// Offset added before taking the log of a frequency.
pub const LOG_EPSILON: f64 = 1e-9;

/// Log value assigned to words with no usable real-world frequency.
///
/// Equal to `ln(LOG_EPSILON)`, the log of a zero frequency, so an unknown word
/// is never more familiar than a known one.
pub const DEFAULT_LOG_FLOOR: f64 = -20.72326583694641;

/// Trait for real-world frequency lookups.
pub trait FrequencySource: Send + Sync {
    /// Relative frequency of a lemma, or `None` when unknown.
    fn frequency(&self, lemma: &str) -> Option<f64>;

    /// Get the name of this source.
    fn name(&self) -> &'static str;
}

/// Log-transform a looked-up frequency.
///
/// Unknown, zero, negative and non-finite frequencies fall back to `floor`.
/// Known frequencies are clamped to it, so `floor` is always the minimum.
pub fn log_frequency(frequency: Option<f64>, floor: f64) -> f64 {
    match frequency {
        Some(f) if f.is_finite() && f > 0.0 => (f + LOG_EPSILON).ln().max(floor),
        _ => floor,
    }
}

/// Source that knows no words. Every lookup falls back to the log floor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFrequencySource;

impl FrequencySource for NoFrequencySource {
    fn frequency(&self, _lemma: &str) -> Option<f64> {
        None
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// In-memory word counts, served as relative frequencies.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    /// Lowercased words and their counts
    counts: AHashMap<String, f64>,
    /// Sum of all counts
    total: f64,
}

impl FrequencyTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add occurrences of a word. Non-positive or non-finite counts are ignored.
    pub fn add(&mut self, word: &str, count: f64) {
        if !count.is_finite() || count <= 0.0 {
            return;
        }
        *self.counts.entry(word.trim().to_lowercase()).or_insert(0.0) += count;
        self.total += count;
    }

    /// Build a table from `(word, count)` pairs.
    pub fn from_counts<'a, I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut table = FrequencyTable::new();
        for (word, count) in counts {
            table.add(word, count);
        }
        table
    }

    /// Load a table from a file with `word frequency` per line.
    ///
    /// Fields may be separated by whitespace or a comma. Lines that do not
    /// parse (including a header line) are skipped.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| WordTierError::input_unavailable(path, e.to_string()))?;
        let reader = BufReader::new(file);

        let mut table = FrequencyTable::new();
        let mut skipped = 0usize;

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|part| !part.is_empty());

            match (parts.next(), parts.next().map(str::parse::<f64>)) {
                (Some(word), Some(Ok(count))) if word.chars().all(|c| c.is_alphabetic()) => {
                    table.add(word, count);
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(
                "Skipped {skipped} unparsable lines in frequency file {}",
                path.display()
            );
        }
        debug!("Loaded {} real-world frequencies from {}", table.len(), path.display());

        Ok(table)
    }

    /// Get the number of distinct words.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Get the total count over all words.
    pub fn total(&self) -> f64 {
        self.total
    }
}

impl FrequencySource for FrequencyTable {
    fn frequency(&self, lemma: &str) -> Option<f64> {
        if self.total <= 0.0 {
            return None;
        }
        self.counts
            .get(&lemma.trim().to_lowercase())
            .map(|count| count / self.total)
    }

    fn name(&self) -> &'static str {
        "table"
    }
}
