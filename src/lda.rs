use std::cmp::Ordering;

use compact_str::CompactString;
use rand::{rngs::StdRng, Rng, SeedableRng};
use string_interner::Symbol;

use crate::tokenize::{to_lowercase, TokenSequence};

// symbol ids are handed out contiguously, so they double as column indices
type VocabInterner = string_interner::StringInterner<string_interner::backend::StringBackend>;

/// Topic-model training configuration.
///
/// Defaults mirror the analysis prototype: 10 topics, 100 sampling passes,
/// symmetric priors. `seed` makes a run reproducible; without it every run
/// draws fresh entropy.
#[derive(Debug, Clone)]
pub struct LdaConfig {
    pub topics: usize,
    pub max_iterations: usize,
    /// Document-topic prior.
    pub alpha: f64,
    /// Topic-word prior.
    pub beta: f64,
    pub seed: Option<u64>,
}

impl Default for LdaConfig {
    fn default() -> Self {
        Self {
            topics: 10,
            max_iterations: 100,
            alpha: 0.1,
            beta: 0.01,
            seed: None,
        }
    }
}

impl LdaConfig {
    /// Check the configuration before any computation starts.
    pub fn validate(&self) -> Result<(), TrainError> {
        if self.topics == 0 {
            return Err(TrainError::InvalidConfig("number of topics must be positive"));
        }
        if self.max_iterations == 0 {
            return Err(TrainError::InvalidConfig(
                "iteration count must be positive",
            ));
        }
        if self.alpha <= 0.0 || self.beta <= 0.0 {
            return Err(TrainError::InvalidConfig("priors must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TrainError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("insufficient data: {0}")]
    InsufficientData(&'static str),
}

/// A trained topic model over a fixed corpus. Immutable after training.
///
/// `topic_word` is K rows of V weights, `doc_topic` is D rows of K weights;
/// every row is a probability distribution summing to 1.
#[derive(Debug, Clone)]
pub struct TopicModel {
    vocabulary: Vec<CompactString>,
    doc_names: Vec<CompactString>,
    topic_word: Vec<Vec<f64>>,
    doc_topic: Vec<Vec<f64>>,
}

impl TopicModel {
    pub fn topic_count(&self) -> usize {
        self.topic_word.len()
    }

    pub fn document_count(&self) -> usize {
        self.doc_topic.len()
    }

    /// Distinct case-folded words, indexed by the column order of
    /// `topic_word`.
    pub fn vocabulary(&self) -> &[CompactString] {
        &self.vocabulary
    }

    pub fn doc_names(&self) -> &[CompactString] {
        &self.doc_names
    }

    pub fn topic_word(&self) -> &[Vec<f64>] {
        &self.topic_word
    }

    pub fn doc_topic(&self) -> &[Vec<f64>] {
        &self.doc_topic
    }

    /// The `n` highest-weight words of a topic, weight descending; ties
    /// break alphabetically so the output is deterministic.
    pub fn top_words(&self, topic: usize, n: usize) -> Vec<(&str, f64)> {
        let mut words: Vec<(&str, f64)> = self
            .vocabulary
            .iter()
            .map(CompactString::as_str)
            .zip(self.topic_word[topic].iter().copied())
            .collect();
        words.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        words.truncate(n);
        words
    }

    /// The most influential topic of a document and its proportion.
    pub fn dominant_topic(&self, doc: usize) -> (usize, f64) {
        self.doc_topic[doc]
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| {
                a.1.partial_cmp(&b.1)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| b.0.cmp(&a.0)) /* prefer the lower topic id on ties */
            })
            .unwrap_or((0, 0.0))
    }
}

/// The narrow seam between the pipeline and the inference algorithm, so the
/// sampler backend is swappable without touching callers.
pub trait TopicModelBackend {
    fn train(&self, corpus: &[TokenSequence], config: &LdaConfig)
        -> Result<TopicModel, TrainError>;
}

/// Collapsed Gibbs sampling backend with a fixed iteration budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct GibbsSampler;

/// Train a topic model with the default backend.
pub fn train(corpus: &[TokenSequence], config: &LdaConfig) -> Result<TopicModel, TrainError> {
    GibbsSampler.train(corpus, config)
}

impl TopicModelBackend for GibbsSampler {
    fn train(
        &self,
        corpus: &[TokenSequence],
        config: &LdaConfig,
    ) -> Result<TopicModel, TrainError> {
        config.validate()?;

        if corpus.is_empty() {
            return Err(TrainError::InsufficientData("corpus is empty"));
        }

        // Case-folded vocabulary.
        let mut interner = VocabInterner::new();
        let mut vocabulary: Vec<CompactString> = Vec::new();
        let mut docs: Vec<Vec<usize>> = Vec::with_capacity(corpus.len());
        let mut doc_names: Vec<CompactString> = Vec::with_capacity(corpus.len());

        for sequence in corpus {
            let mut words = Vec::with_capacity(sequence.token_count());
            for token in sequence.tokens() {
                let folded = to_lowercase(token);
                let id = interner.get_or_intern(&folded).to_usize();
                if id == vocabulary.len() {
                    vocabulary.push(CompactString::from(folded));
                }
                words.push(id);
            }
            docs.push(words);
            doc_names.push(CompactString::from(sequence.name()));
        }

        let num_words = vocabulary.len();
        if num_words == 0 {
            return Err(TrainError::InsufficientData(
                "vocabulary is empty after filtering",
            ));
        }

        let num_topics = config.topics;
        let num_docs = docs.len();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        tracing::debug!(
            documents = num_docs,
            vocabulary = num_words,
            topics = num_topics,
            iterations = config.max_iterations,
            "training topic model"
        );

        // Sampling state: per-word, per-document and global topic counts,
        // plus the current topic assignment of every token position.
        let mut word_topic = vec![vec![0u64; num_topics]; num_words];
        let mut doc_topic = vec![vec![0u64; num_topics]; num_docs];
        let mut topic_totals = vec![0u64; num_topics];
        let mut assignments: Vec<Vec<usize>> = Vec::with_capacity(num_docs);

        for (d, doc) in docs.iter().enumerate() {
            let mut doc_assignments = Vec::with_capacity(doc.len());
            for &w in doc {
                let topic = rng.gen_range(0..num_topics);
                word_topic[w][topic] += 1;
                doc_topic[d][topic] += 1;
                topic_totals[topic] += 1;
                doc_assignments.push(topic);
            }
            assignments.push(doc_assignments);
        }

        let beta_sum = config.beta * num_words as f64;
        let mut weights = vec![0.0f64; num_topics];

        for iteration in 0..config.max_iterations {
            for (d, doc) in docs.iter().enumerate() {
                for (pos, &w) in doc.iter().enumerate() {
                    let old_topic = assignments[d][pos];
                    word_topic[w][old_topic] -= 1;
                    doc_topic[d][old_topic] -= 1;
                    topic_totals[old_topic] -= 1;

                    let mut total = 0.0;
                    for (k, weight) in weights.iter_mut().enumerate() {
                        let word_part = (word_topic[w][k] as f64 + config.beta)
                            / (topic_totals[k] as f64 + beta_sum);
                        let doc_part = doc_topic[d][k] as f64 + config.alpha;
                        *weight = word_part * doc_part;
                        total += *weight;
                    }

                    let u = rng.gen::<f64>() * total;
                    let mut acc = 0.0;
                    let mut new_topic = num_topics - 1;
                    for (k, &weight) in weights.iter().enumerate() {
                        acc += weight;
                        if u < acc {
                            new_topic = k;
                            break;
                        }
                    }

                    word_topic[w][new_topic] += 1;
                    doc_topic[d][new_topic] += 1;
                    topic_totals[new_topic] += 1;
                    assignments[d][pos] = new_topic;
                }
            }

            if (iteration + 1) % 20 == 0 {
                tracing::debug!(pass = iteration + 1, "sampling pass complete");
            }
        }

        // Smoothed counts normalize to row-stochastic matrices.
        let topic_word_matrix: Vec<Vec<f64>> = (0..num_topics)
            .map(|k| {
                let denominator = topic_totals[k] as f64 + beta_sum;
                (0..num_words)
                    .map(|w| (word_topic[w][k] as f64 + config.beta) / denominator)
                    .collect()
            })
            .collect();

        let alpha_sum = config.alpha * num_topics as f64;
        let doc_topic_matrix: Vec<Vec<f64>> = doc_topic
            .iter()
            .enumerate()
            .map(|(d, counts)| {
                let denominator = docs[d].len() as f64 + alpha_sum;
                counts
                    .iter()
                    .map(|&count| (count as f64 + config.alpha) / denominator)
                    .collect()
            })
            .collect();

        Ok(TopicModel {
            vocabulary,
            doc_names,
            topic_word: topic_word_matrix,
            doc_topic: doc_topic_matrix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::tokenize;

    fn sample_corpus() -> Vec<TokenSequence> {
        vec![
            tokenize("imvula", "imvula iyana emhlabeni imvula inetisa emasimi"),
            tokenize("lilanga", "lilanga liphuma ekuseni lilanga lishisa emini"),
            tokenize("umfula", "umfula ugeleta entsabeni umfula ugcwele imvula"),
        ]
    }

    fn config(topics: usize, seed: u64) -> LdaConfig {
        LdaConfig {
            topics,
            max_iterations: 50,
            seed: Some(seed),
            ..LdaConfig::default()
        }
    }

    #[test]
    fn test_zero_topics_is_rejected_before_training() {
        let result = train(&sample_corpus(), &config(0, 7));
        assert!(matches!(result, Err(TrainError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_iterations_is_rejected() {
        let mut cfg = config(2, 7);
        cfg.max_iterations = 0;
        assert!(matches!(
            train(&sample_corpus(), &cfg),
            Err(TrainError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_corpus_is_insufficient() {
        let result = train(&[], &config(2, 7));
        assert!(matches!(result, Err(TrainError::InsufficientData(_))));
    }

    #[test]
    fn test_empty_vocabulary_is_insufficient() {
        let corpus = vec![tokenize("empty", ""), tokenize("blank", "   \n  ")];
        let result = train(&corpus, &config(2, 7));
        assert!(matches!(result, Err(TrainError::InsufficientData(_))));
    }

    #[test]
    fn test_rows_are_probability_distributions() {
        let model = train(&sample_corpus(), &config(3, 42)).unwrap();

        for row in model.topic_word() {
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-6, "topic-word row sums to {sum}");
            assert!(row.iter().all(|&w| w > 0.0));
        }
        for row in model.doc_topic() {
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-6, "doc-topic row sums to {sum}");
        }
    }

    #[test]
    fn test_same_seed_reproduces_the_model() {
        let corpus = sample_corpus();
        let first = train(&corpus, &config(3, 99)).unwrap();
        let second = train(&corpus, &config(3, 99)).unwrap();

        assert_eq!(first.topic_word(), second.topic_word());
        assert_eq!(first.doc_topic(), second.doc_topic());
        assert_eq!(first.vocabulary(), second.vocabulary());
    }

    #[test]
    fn test_top_words_are_sorted_and_bounded() {
        let model = train(&sample_corpus(), &config(2, 5)).unwrap();

        let words = model.top_words(0, 4);
        assert_eq!(words.len(), 4);
        assert!(words.windows(2).all(|w| w[0].1 >= w[1].1));

        // asking for more words than the vocabulary holds is fine
        let all = model.top_words(0, 1000);
        assert_eq!(all.len(), model.vocabulary().len());
    }

    #[test]
    fn test_dominant_topic_is_a_valid_index() {
        let model = train(&sample_corpus(), &config(4, 11)).unwrap();

        for doc in 0..model.document_count() {
            let (topic, proportion) = model.dominant_topic(doc);
            assert!(topic < model.topic_count());
            assert!(proportion > 0.0 && proportion <= 1.0);
        }
    }

    #[test]
    fn test_fully_filtered_document_gets_uniform_topics() {
        let corpus = vec![
            tokenize("words", "imvula lilanga umfula intsaba"),
            tokenize("empty", ""),
        ];
        let model = train(&corpus, &config(2, 3)).unwrap();

        let row = &model.doc_topic()[1];
        assert!((row[0] - 0.5).abs() < 1e-9);
        assert!((row[1] - 0.5).abs() < 1e-9);
    }
}
