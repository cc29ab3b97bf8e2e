//! Lexical collaborators: normalization, lemmatization and content filtering.

pub mod dictionary;
pub mod filter;
pub mod lemmatizer;
pub mod normalize;

pub use dictionary::{Blocklist, Lexicon};
pub use filter::{ContentFilter, FilterConfig, Rejection};
pub use lemmatizer::{IdentityLemmatizer, Lemmatizer, SuffixLemmatizer};
pub use normalize::{NormalizationConfig, NormalizedWord, WordNormalizer};
