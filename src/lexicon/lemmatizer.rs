//! Lemmatization of canonical words.

use std::sync::Arc;

use ahash::AHashMap;

use crate::lexicon::dictionary::Lexicon;

/// Trait for reducing a word to its dictionary base form.
pub trait Lemmatizer: Send + Sync {
    /// Lemmatize an uppercase word. The result is uppercase.
    fn lemmatize(&self, word: &str) -> String;

    /// Get the name of this lemmatizer.
    fn name(&self) -> &'static str;
}

/// Lemmatizer that returns every word unchanged.
#[derive(Debug, Clone, Default)]
pub struct IdentityLemmatizer;

impl Lemmatizer for IdentityLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        word.to_uppercase()
    }

    fn name(&self) -> &'static str {
        "identity"
    }
}

const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("CHILDREN", "CHILD"),
    ("PEOPLE", "PERSON"),
    ("MICE", "MOUSE"),
    ("LICE", "LOUSE"),
    ("GEESE", "GOOSE"),
    ("FEET", "FOOT"),
    ("TEETH", "TOOTH"),
    ("OXEN", "OX"),
    ("CACTI", "CACTUS"),
    ("FUNGI", "FUNGUS"),
    ("CRITERIA", "CRITERION"),
    ("PHENOMENA", "PHENOMENON"),
    ("KNIVES", "KNIFE"),
    ("WIVES", "WIFE"),
    ("LIVES", "LIFE"),
    ("LEAVES", "LEAF"),
    ("WOLVES", "WOLF"),
    ("HALVES", "HALF"),
    ("SHELVES", "SHELF"),
    ("LOAVES", "LOAF"),
    ("THIEVES", "THIEF"),
    ("BUSES", "BUS"),
    ("GASES", "GAS"),
    ("LENSES", "LENS"),
];

/// Endings that look plural but are not.
const PROTECTED_ENDINGS: &[&str] = &["SS", "US", "IS"];

/// Noun detachment rules, longest suffix first.
const DETACHMENT_RULES: &[(&str, &str)] = &[
    ("CHES", "CH"),
    ("SHES", "SH"),
    ("IES", "Y"),
    ("SES", "S"),
    ("XES", "X"),
    ("ZES", "Z"),
    ("MEN", "MAN"),
    ("S", ""),
];

/// Rule-based noun lemmatizer.
///
/// Without a lexicon the first applicable rule wins, and `SES` only loses its
/// `ES` after a double S (`CLASSES`), so `HORSES` keeps its E. With a
/// lexicon, words already in it are kept as they are and a candidate base
/// form is accepted only if the lexicon knows it.
#[derive(Debug, Clone)]
pub struct SuffixLemmatizer {
    irregular: AHashMap<&'static str, &'static str>,
    lexicon: Option<Arc<Lexicon>>,
    min_stem_length: usize,
}

impl Default for SuffixLemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SuffixLemmatizer {
    /// Create a lemmatizer that applies rules without validation.
    pub fn new() -> Self {
        SuffixLemmatizer {
            irregular: IRREGULAR_PLURALS.iter().copied().collect(),
            lexicon: None,
            min_stem_length: 3,
        }
    }

    /// Create a lemmatizer that validates base forms against a lexicon.
    pub fn with_lexicon(lexicon: Arc<Lexicon>) -> Self {
        SuffixLemmatizer {
            lexicon: Some(lexicon),
            ..Self::new()
        }
    }

    /// Candidate base forms in rule order.
    fn candidates(&self, word: &str) -> Vec<String> {
        if PROTECTED_ENDINGS.iter().any(|ending| word.ends_with(ending)) {
            return Vec::new();
        }

        DETACHMENT_RULES
            .iter()
            .filter(|(suffix, _)| word.ends_with(suffix))
            .filter(|(suffix, _)| {
                *suffix != "SES" || self.lexicon.is_some() || word.ends_with("SSES")
            })
            .map(|(suffix, replacement)| {
                format!("{}{}", &word[..word.len() - suffix.len()], replacement)
            })
            .filter(|candidate| candidate.len() >= self.min_stem_length)
            .collect()
    }
}

impl Lemmatizer for SuffixLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        let word = word.trim().to_uppercase();

        if let Some(base) = self.irregular.get(word.as_str()) {
            return (*base).to_string();
        }

        match &self.lexicon {
            Some(lexicon) => {
                if lexicon.contains(&word) {
                    return word;
                }
                self.candidates(&word)
                    .into_iter()
                    .find(|candidate| lexicon.contains(candidate))
                    .unwrap_or(word)
            }
            None => self.candidates(&word).into_iter().next().unwrap_or(word),
        }
    }

    fn name(&self) -> &'static str {
        "suffix"
    }
}
