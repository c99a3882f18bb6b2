use compact_str::CompactString;
use rustc_hash::FxHashMap;

use crate::tokenize::{to_lowercase, TokenSequence};

/// Per-document summary statistics, computed on the unfiltered token
/// sequence (stopwords still count towards the token total).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStats {
    pub name: CompactString,
    pub sentences: usize,
    pub tokens: usize,
}

impl DocumentStats {
    pub fn of(sequence: &TokenSequence) -> Self {
        Self {
            name: CompactString::from(sequence.name()),
            sentences: sequence.sentence_count(),
            tokens: sequence.token_count(),
        }
    }

    pub fn tokens_per_sentence(&self) -> f64 {
        if self.sentences == 0 {
            0.0
        } else {
            self.tokens as f64 / self.sentences as f64
        }
    }
}

/// A mapping from case-folded token to occurrence count, accumulated over
/// one or more filtered token sequences.
///
/// The internal map has no iteration order; use [`FrequencyTable::sorted`]
/// for reporting. The sum of all counts equals the number of tokens fed in.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: FxHashMap<CompactString, u64>,
    total: u64,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sequence(sequence: &TokenSequence) -> Self {
        let mut table = Self::new();
        table.add_sequence(sequence);
        table
    }

    /// Accumulate every token of `sequence`, case-folded.
    pub fn add_sequence(&mut self, sequence: &TokenSequence) {
        for token in sequence.tokens() {
            let folded = CompactString::from(to_lowercase(token));
            *self.counts.entry(folded).or_insert(0) += 1;
            self.total += 1;
        }
    }

    /// Sum another table into this one.
    pub fn merge(&mut self, other: &FrequencyTable) {
        for (token, count) in &other.counts {
            *self.counts.entry(token.clone()).or_insert(0) += count;
        }
        self.total += other.total;
    }

    pub fn count(&self, token: &str) -> u64 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Total number of counted tokens (sum of all counts).
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CompactString, u64)> {
        self.counts.iter().map(|(token, &count)| (token, count))
    }

    /// Entries sorted by count descending, ties broken by token ascending
    /// so the output is deterministic.
    pub fn sorted(&self) -> Vec<(CompactString, u64)> {
        let mut entries: Vec<(CompactString, u64)> = self
            .counts
            .iter()
            .map(|(token, &count)| (token.clone(), count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::tokenize;
    use proptest::prelude::*;

    #[test]
    fn test_document_stats() {
        let sequence = tokenize("demo", "Ngiyakuthanda kakhulu. Live kuhle.");
        let stats = DocumentStats::of(&sequence);

        assert_eq!(stats.name, "demo");
        assert_eq!(stats.sentences, 2);
        assert_eq!(stats.tokens, 4);
        assert!((stats.tokens_per_sentence() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_document_stats() {
        let stats = DocumentStats::of(&tokenize("empty", ""));
        assert_eq!(stats.sentences, 0);
        assert_eq!(stats.tokens, 0);
        assert_eq!(stats.tokens_per_sentence(), 0.0);
    }

    #[test]
    fn test_counts_are_case_folded() {
        let sequence = tokenize("demo", "Live live LIVE kuhle");
        let table = FrequencyTable::from_sequence(&sequence);

        assert_eq!(table.count("live"), 3);
        assert_eq!(table.count("kuhle"), 1);
        assert_eq!(table.count("Live"), 0);
        assert_eq!(table.total(), 4);
    }

    #[test]
    fn test_merge_sums_counts() {
        let mut table = FrequencyTable::from_sequence(&tokenize("one", "live kuhle live"));
        let other = FrequencyTable::from_sequence(&tokenize("two", "kuhle kakhulu"));

        table.merge(&other);
        assert_eq!(table.count("live"), 2);
        assert_eq!(table.count("kuhle"), 2);
        assert_eq!(table.count("kakhulu"), 1);
        assert_eq!(table.total(), 5);
    }

    #[test]
    fn test_sorted_is_deterministic() {
        let table = FrequencyTable::from_sequence(&tokenize(
            "demo",
            "umfula umfula intsaba intsaba sihlahla",
        ));

        let sorted = table.sorted();
        assert_eq!(sorted[0].0, "intsaba"); /* tie broken alphabetically */
        assert_eq!(sorted[1].0, "umfula");
        assert_eq!(sorted[2], (CompactString::from("sihlahla"), 1));
    }

    proptest! {
        #[test]
        fn table_total_equals_token_count(input in ".*") {
            let sequence = tokenize("prop", &input);
            let table = FrequencyTable::from_sequence(&sequence);

            prop_assert_eq!(table.total(), sequence.token_count() as u64);
            prop_assert_eq!(table.iter().map(|(_, c)| c).sum::<u64>(), table.total());
        }
    }
}
