use std::path::Path;

use compact_str::CompactString;
use rustc_hash::FxHashSet;

use crate::{
    corpus::InputError,
    tokenize::{to_lowercase, TokenSequence},
};

// High-frequency, low-information Siswati words: concords, demonstratives,
// pronouns, conjunctions and discourse particles. Curated from the word
// frequencies of a Siswati novel; coverage of agglutinated forms is known
// to be incomplete.
const SISWATI: &[&str] = &[
    "na", "ne", "nga", "ku", "ka", "la", "le", "lo", "lona", "loko", "loku", "lolu", "lesi",
    "leso", "laba", "labo", "leli", "lelo", "leyo", "kutsi", "kuze", "khona", "kona", "futsi",
    "kepha", "kodvwa", "noma", "ngoba", "njengoba", "lapho", "lapha", "kanye", "kanje", "kahle",
    "kakhulu", "kancane", "nje", "phela", "pho", "kwatsi", "kwase", "bese", "uma", "nangabe",
    "yebo", "cha", "mine", "wena", "yena", "tsine", "nine", "bona", "bo", "ba", "be", "wa", "we",
    "ye", "yi", "se", "si", "ke", "ngi", "nami", "naye", "nabo", "kuye", "kubo", "kimi", "kuwe",
    "onkhe", "konkhe", "bonkhe", "yonkhe", "lonkhe", "letinye", "lamanye", "lomunye", "lenye",
    "kantsi", "ngako", "ngakho", "manje", "nyalo", "njalo", "sale", "solo",
];

/// An immutable set of stopwords, loaded once and passed by reference into
/// the filter. Membership checks are case-insensitive; the stored words are
/// lowercase.
#[derive(Debug, Clone)]
pub struct StopwordSet {
    words: FxHashSet<CompactString>,
}

impl StopwordSet {
    /// The built-in Siswati stopword list.
    pub fn siswati() -> Self {
        Self::from_words(SISWATI.iter().copied())
    }

    /// An empty set (no filtering).
    pub fn empty() -> Self {
        Self {
            words: FxHashSet::default(),
        }
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| CompactString::from(to_lowercase(w.as_ref())))
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Load a stopword list from a flat text file, one or more
    /// whitespace-separated words per line.
    pub fn from_file(path: &Path) -> Result<Self, InputError> {
        let text = std::fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let set = Self::from_words(text.split_whitespace());
        tracing::debug!(words = set.len(), path = %path.display(), "loaded stopword list");
        Ok(set)
    }

    pub fn contains(&self, token: &str) -> bool {
        if self.words.contains(token) {
            return true;
        }
        if token.chars().any(char::is_uppercase) {
            self.words.contains(to_lowercase(token).as_str())
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Produce a new sequence containing only tokens whose case-folded form
    /// is absent from this set. Original casing and sentence boundaries are
    /// preserved; sentences left without tokens are dropped.
    pub fn filter(&self, sequence: &TokenSequence) -> TokenSequence {
        let sentences = sequence
            .sentences()
            .iter()
            .map(|sentence| {
                sentence
                    .iter()
                    .filter(|token| !self.contains(token))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .filter(|tokens| !tokens.is_empty())
            .collect();

        TokenSequence::new(CompactString::from(sequence.name()), sentences)
    }
}
