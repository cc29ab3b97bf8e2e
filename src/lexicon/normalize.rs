//! Canonicalization of raw word rows.
//!
//! Turns the raw `(word, count)` table into deduplicated, uppercase,
//! alphabetic words with their lemmas.

use std::sync::Arc;

use ahash::AHashMap;
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WordTierError};
use crate::io::reader::RawWordRow;
use crate::lexicon::lemmatizer::Lemmatizer;

/// Configuration for word normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Minimum number of letters a word must have.
    pub min_word_length: usize,
    /// Words removed before anything else (compared uppercase).
    pub excluded_words: Vec<String>,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            min_word_length: 2,
            excluded_words: vec!["SPELL".to_string(), "WAND".to_string()],
        }
    }
}

impl NormalizationConfig {
    /// Set the minimum word length.
    pub fn with_min_word_length(mut self, min_word_length: usize) -> Self {
        self.min_word_length = min_word_length;
        self
    }

    /// Set the excluded words.
    pub fn with_excluded_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_words = words.into_iter().map(Into::into).collect();
        self
    }
}

/// A canonical word ready for feature computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedWord {
    pub word: String,
    pub lemma: String,
    pub corpus_frequency: f64,
}

/// Validates, canonicalizes, deduplicates and lemmatizes raw words.
pub struct WordNormalizer {
    excluded: Vec<String>,
    pattern: Regex,
    lemmatizer: Arc<dyn Lemmatizer>,
}

impl std::fmt::Debug for WordNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordNormalizer")
            .field("excluded", &self.excluded)
            .field("pattern", &self.pattern.as_str())
            .field("lemmatizer", &self.lemmatizer.name())
            .finish()
    }
}

impl WordNormalizer {
    /// Create a new normalizer.
    pub fn new(config: &NormalizationConfig, lemmatizer: Arc<dyn Lemmatizer>) -> Result<Self> {
        if config.min_word_length == 0 {
            return Err(WordTierError::invalid_config(
                "min_word_length must be at least 1",
            ));
        }

        let pattern = Regex::new(&format!("^[A-Z]{{{},}}$", config.min_word_length))
            .map_err(|e| WordTierError::invalid_config(format!("Invalid word pattern: {e}")))?;

        Ok(WordNormalizer {
            excluded: config
                .excluded_words
                .iter()
                .map(|w| w.trim().to_uppercase())
                .collect(),
            pattern,
            lemmatizer,
        })
    }

    /// Canonical form of a raw word, or `None` if the word is not allowed.
    pub fn canonicalize(&self, raw: &str) -> Option<String> {
        let word = raw.trim().to_uppercase();
        if self.excluded.contains(&word) || !self.pattern.is_match(&word) {
            return None;
        }
        Some(word)
    }

    /// Normalize a raw table.
    ///
    /// Duplicate canonical words are merged into the first occurrence and
    /// their corpus frequencies summed.
    pub fn normalize(&self, rows: &[RawWordRow]) -> Vec<NormalizedWord> {
        let mut words: Vec<NormalizedWord> = Vec::with_capacity(rows.len());
        let mut positions: AHashMap<String, usize> = AHashMap::with_capacity(rows.len());
        let mut rejected = 0usize;
        let mut merged = 0usize;

        for row in rows {
            let Some(word) = self.canonicalize(&row.word) else {
                rejected += 1;
                continue;
            };

            if let Some(&position) = positions.get(&word) {
                words[position].corpus_frequency += row.frequency;
                merged += 1;
                continue;
            }

            let lemma = self.lemmatizer.lemmatize(&word);
            positions.insert(word.clone(), words.len());
            words.push(NormalizedWord {
                word,
                lemma,
                corpus_frequency: row.frequency,
            });
        }

        debug!(
            "Lemmatized {} words with the {} lemmatizer",
            words.len(),
            self.lemmatizer.name()
        );
        info!(
            "Normalized {} of {} rows ({} rejected, {} duplicates merged)",
            words.len(),
            rows.len(),
            rejected,
            merged
        );

        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::lemmatizer::{IdentityLemmatizer, SuffixLemmatizer};

    fn row(word: &str, frequency: f64) -> RawWordRow {
        RawWordRow {
            word: word.to_string(),
            frequency,
        }
    }

    #[test]
    fn test_canonicalize() {
        let normalizer =
            WordNormalizer::new(&NormalizationConfig::default(), Arc::new(IdentityLemmatizer))
                .unwrap();

        assert_eq!(normalizer.canonicalize(" cat "), Some("CAT".to_string()));
        assert_eq!(normalizer.canonicalize("ox"), Some("OX".to_string()));
        assert_eq!(normalizer.canonicalize("a"), None);
        assert_eq!(normalizer.canonicalize("don't"), None);
        assert_eq!(normalizer.canonicalize("café"), None);
        assert_eq!(normalizer.canonicalize("spell"), None);
        assert_eq!(normalizer.canonicalize("Wand"), None);
    }

    #[test]
    fn test_normalize_merges_duplicates() {
        let normalizer =
            WordNormalizer::new(&NormalizationConfig::default(), Arc::new(SuffixLemmatizer::new()))
                .unwrap();
        let rows = vec![
            row("cats", 10.0),
            row("dog", 4.0),
            row("CATS", 5.0),
            row("x", 100.0),
            row("wand", 7.0),
        ];

        let words = normalizer.normalize(&rows);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].word, "CATS");
        assert_eq!(words[0].lemma, "CAT");
        assert_eq!(words[0].corpus_frequency, 15.0);
        assert_eq!(words[1].word, "DOG");
    }

    #[test]
    fn test_min_word_length() {
        let config = NormalizationConfig::default().with_min_word_length(4);
        let normalizer = WordNormalizer::new(&config, Arc::new(IdentityLemmatizer)).unwrap();
        assert_eq!(normalizer.canonicalize("cat"), None);
        assert_eq!(normalizer.canonicalize("bird"), Some("BIRD".to_string()));

        let config = NormalizationConfig::default().with_min_word_length(0);
        assert!(WordNormalizer::new(&config, Arc::new(IdentityLemmatizer)).is_err());
    }
}
