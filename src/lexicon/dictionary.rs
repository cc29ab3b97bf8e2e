//! Immutable word sets: the English lexicon and the blocklist.
//!
//! Both are loaded once and shared behind an `Arc`; neither is ever mutated
//! after construction.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::AHashSet;
use log::debug;

use crate::error::{Result, WordTierError};

/// Read one uppercase word per line, skipping blanks and `#` comments.
fn read_word_set(path: &Path) -> Result<AHashSet<String>> {
    let file =
        File::open(path).map_err(|e| WordTierError::input_unavailable(path, e.to_string()))?;
    let reader = BufReader::new(file);

    let mut words = AHashSet::new();
    for line in reader.lines() {
        let line = line?;
        let word = line.trim();
        if word.is_empty() || word.starts_with('#') {
            continue;
        }
        words.insert(word.to_uppercase());
    }

    Ok(words)
}

/// Set of known English words.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    words: AHashSet<String>,
}

impl Lexicon {
    /// Build a lexicon from any collection of words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Lexicon {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_uppercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Load a lexicon from a text file with one word per line.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let words = read_word_set(path)?;
        debug!("Loaded lexicon of {} words from {}", words.len(), path.display());
        Ok(Lexicon { words })
    }

    /// Check if a word exists in the lexicon. Case-insensitive.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.trim().to_uppercase())
    }

    /// Get the number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check whether the lexicon is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Set of words that must never be exported.
#[derive(Debug, Clone, Default)]
pub struct Blocklist {
    words: AHashSet<String>,
}

impl Blocklist {
    /// Create an empty blocklist.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a blocklist from any collection of words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Blocklist {
            words: Lexicon::from_words(words).words,
        }
    }

    /// Load a blocklist from a text file with one word per line.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let words = read_word_set(path)?;
        debug!("Loaded blocklist of {} words from {}", words.len(), path.display());
        Ok(Blocklist { words })
    }

    /// Check whether a word is blocked. Case-insensitive.
    pub fn is_blocked(&self, word: &str) -> bool {
        self.words.contains(&word.trim().to_uppercase())
    }

    /// Get the number of blocked words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check whether the blocklist is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_lexicon_case_insensitive() {
        let lexicon = Lexicon::from_words(["cat", " Dog ", ""]);
        assert_eq!(lexicon.len(), 2);
        assert!(lexicon.contains("CAT"));
        assert!(lexicon.contains("dog"));
        assert!(!lexicon.contains("emu"));
    }

    #[test]
    fn test_load_word_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# blocked words").unwrap();
        writeln!(file, "darn").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "HECK").unwrap();
        file.flush().unwrap();

        let blocklist = Blocklist::load_from_file(file.path()).unwrap();
        assert_eq!(blocklist.len(), 2);
        assert!(blocklist.is_blocked("Darn"));
        assert!(blocklist.is_blocked("heck"));

        let lexicon = Lexicon::load_from_file(file.path()).unwrap();
        assert!(lexicon.contains("darn"));
    }

    #[test]
    fn test_missing_lexicon_file() {
        let result = Lexicon::load_from_file("/nonexistent/words.txt");
        assert!(matches!(result, Err(WordTierError::InputUnavailable { .. })));
        assert!(Blocklist::empty().is_empty());
    }
}
