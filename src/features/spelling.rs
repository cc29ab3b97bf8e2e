//! Spelling sub-signals computed from a lemma.
//!
//! Seven discrete signals describe how easy a word is to spell. Each is later
//! standardized on its own and the z-scores are averaged into a single
//! spelling-easiness score.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

/// Number of spelling sub-signals.
pub const SPELLING_SIGNAL_COUNT: usize = 7;

const VOWELS: &str = "AEIOU";
const FIRST_LETTERS: &str = "SCAT";
const LAST_LETTERS: &str = "EYRT";

/// Raw spelling sub-signals of one lemma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpellingSignals {
    /// True when no letter occurs twice (the inverted duplicate-letter penalty).
    pub distinct_letters: bool,
    /// Number of vowels.
    pub vowel_count: u32,
    /// Number of alphabetic non-vowels.
    pub consonant_count: u32,
    /// Contains the digraph "TH".
    pub has_th: bool,
    /// Contains the digraph "ER".
    pub has_er: bool,
    /// First letter is one of S, C, A, T.
    pub first_in_set: bool,
    /// Last letter is one of E, Y, R, T.
    pub last_in_set: bool,
}

impl SpellingSignals {
    /// Compute the signals for a lemma. Case-insensitive.
    pub fn from_lemma(lemma: &str) -> Self {
        let upper = lemma.trim().to_uppercase();

        let mut seen = AHashSet::with_capacity(upper.len());
        let distinct_letters = upper.chars().all(|c| seen.insert(c));

        let vowel_count = upper.chars().filter(|c| VOWELS.contains(*c)).count() as u32;
        let consonant_count = upper
            .chars()
            .filter(|c| c.is_alphabetic() && !VOWELS.contains(*c))
            .count() as u32;

        let first_in_set = upper
            .chars()
            .next()
            .is_some_and(|c| FIRST_LETTERS.contains(c));
        let last_in_set = upper
            .chars()
            .next_back()
            .is_some_and(|c| LAST_LETTERS.contains(c));

        SpellingSignals {
            distinct_letters,
            vowel_count,
            consonant_count,
            has_th: upper.contains("TH"),
            has_er: upper.contains("ER"),
            first_in_set,
            last_in_set,
        }
    }

    /// Signals as numbers, in a fixed column order.
    pub fn as_array(&self) -> [f64; SPELLING_SIGNAL_COUNT] {
        [
            flag(self.distinct_letters),
            self.vowel_count as f64,
            self.consonant_count as f64,
            flag(self.has_th),
            flag(self.has_er),
            flag(self.first_in_set),
            flag(self.last_in_set),
        ]
    }
}

fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}
