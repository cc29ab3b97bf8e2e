//! Content filter applied before export.

use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::lexicon::dictionary::{Blocklist, Lexicon};
use crate::record::WordRecord;

/// Configuration for the export-side content filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Shortest exported word.
    pub min_length: usize,
    /// Longest exported word.
    pub max_length: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_length: 3,
            max_length: 12,
        }
    }
}

/// Why a word was kept out of the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Contains something other than A-Z.
    NonAlphabetic,
    /// Shorter or longer than the configured bounds.
    Length,
    /// Not an English word.
    NotInLexicon,
    /// Word or lemma is on the blocklist.
    Blocked,
}

/// Removes non-lexicon and inappropriate words.
#[derive(Debug, Clone)]
pub struct ContentFilter {
    config: FilterConfig,
    lexicon: Option<Arc<Lexicon>>,
    blocklist: Arc<Blocklist>,
}

impl ContentFilter {
    /// Create a filter. Without a lexicon, lexicon membership is not checked.
    pub fn new(config: FilterConfig, lexicon: Option<Arc<Lexicon>>, blocklist: Arc<Blocklist>) -> Self {
        ContentFilter {
            config,
            lexicon,
            blocklist,
        }
    }

    /// Check a word and its lemma, returning the first failed rule.
    pub fn check(&self, word: &str, lemma: &str) -> Option<Rejection> {
        let word = word.trim();

        if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphabetic()) {
            return Some(Rejection::NonAlphabetic);
        }

        let length = word.len();
        if length < self.config.min_length || length > self.config.max_length {
            return Some(Rejection::Length);
        }

        if let Some(lexicon) = &self.lexicon
            && !lexicon.contains(word)
        {
            return Some(Rejection::NotInLexicon);
        }

        if self.blocklist.is_blocked(word) || self.blocklist.is_blocked(lemma) {
            return Some(Rejection::Blocked);
        }

        None
    }

    /// Whether a word passes every rule.
    pub fn is_allowed(&self, word: &str, lemma: &str) -> bool {
        self.check(word, lemma).is_none()
    }

    /// Keep only the records that pass the filter.
    pub fn filter(&self, records: &[WordRecord]) -> Vec<WordRecord> {
        let kept: Vec<WordRecord> = records
            .iter()
            .filter(|record| self.is_allowed(&record.word, &record.lemma))
            .cloned()
            .collect();

        info!(
            "Content filter kept {} of {} words",
            kept.len(),
            records.len()
        );

        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_with_lexicon() -> ContentFilter {
        ContentFilter::new(
            FilterConfig::default(),
            Some(Arc::new(Lexicon::from_words(["CAT", "DOGS", "HECK", "OX", "ENCYCLOPEDIAS"]))),
            Arc::new(Blocklist::from_words(["heck", "dog"])),
        )
    }

    #[test]
    fn test_rules() {
        let filter = filter_with_lexicon();

        assert_eq!(filter.check("CAT", "CAT"), None);
        assert_eq!(filter.check("OX", "OX"), Some(Rejection::Length));
        assert_eq!(filter.check("ENCYCLOPEDIAS", "ENCYCLOPEDIA"), Some(Rejection::Length));
        assert_eq!(filter.check("EMU", "EMU"), Some(Rejection::NotInLexicon));
        assert_eq!(filter.check("HECK", "HECK"), Some(Rejection::Blocked));
        assert_eq!(filter.check("DOGS", "DOG"), Some(Rejection::Blocked));
        assert_eq!(filter.check("C4T", "C4T"), Some(Rejection::NonAlphabetic));
    }

    #[test]
    fn test_without_lexicon() {
        let filter = ContentFilter::new(FilterConfig::default(), None, Arc::new(Blocklist::empty()));
        assert!(filter.is_allowed("EMU", "EMU"));
        assert!(!filter.is_allowed("EM", "EM"));
    }
}
