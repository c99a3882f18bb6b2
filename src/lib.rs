// SPDX-License-Identifier: MPL-2.0
//! # lulwimi
//!
//! Analysis of Siswati-language text documents: sentence and token counts, word-cloud layouts
//! and LDA topic modeling, rendered into SVG artifacts and an HTML report.
//!
//! ## Overview
//!
//! `lulwimi` reads the parts of a text (e.g. the chapters of a book) and runs each part through
//! a small, synchronous pipeline: the tokenizer splits raw text into sentences and word tokens,
//! the stopword filter removes a curated list of high-frequency Siswati function words, and the
//! filtered tokens feed both a frequency counter (word clouds, summary statistics) and a topic
//! model trainer (collapsed Gibbs sampling). Every stage is a pure transformation that hands its
//! output by value to the next stage; there is no shared mutable state.
//!
//! **Key Features:**
//!
//! - **Siswati-aware defaults**: a built-in stopword list of Siswati concords, demonstratives and
//!   discourse particles; plain whitespace/punctuation tokenization as the baseline.
//! - **Reproducible topic models**: training with a fixed seed produces identical matrices.
//! - **Self-contained artifacts**: word clouds and topic panels are written as SVG, the summary
//!   as a single HTML file, with no rendering toolkit required.
//!
//! ## Getting Started
//!
//! ### Basic Usage
//!
//! The whole pipeline works on in-memory values:
//!
//! ```rust
//! use lulwimi::lda::{self, LdaConfig};
//! use lulwimi::stats::{DocumentStats, FrequencyTable};
//! use lulwimi::stopwords::StopwordSet;
//! use lulwimi::tokenize;
//!
//! let sequence = tokenize::tokenize("demo", "Ngiyakuthanda kakhulu. Live kuhle.");
//! assert_eq!(DocumentStats::of(&sequence).sentences, 2);
//!
//! let stopwords = StopwordSet::siswati();
//! let filtered = stopwords.filter(&sequence);
//!
//! let table = FrequencyTable::from_sequence(&filtered);
//! assert_eq!(table.total(), filtered.token_count() as u64);
//!
//! let config = LdaConfig { topics: 2, max_iterations: 20, seed: Some(7), ..LdaConfig::default() };
//! let model = lda::train(&[filtered], &config).unwrap();
//! assert_eq!(model.topic_count(), 2);
//! ```
//!
//! ### Analysing Files
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! use lulwimi::corpus::Corpus;
//! use lulwimi::report::{WordCloudLayout, WordCloudOptions};
//! use lulwimi::stats::FrequencyTable;
//! use lulwimi::stopwords::StopwordSet;
//! use lulwimi::tokenize;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let corpus = Corpus::from_paths(&[PathBuf::from("sahluko_1.txt")])?;
//!     let stopwords = StopwordSet::siswati();
//!
//!     let mut table = FrequencyTable::new();
//!     for document in corpus.documents() {
//!         let sequence = tokenize::tokenize(&document.name, &document.text);
//!         table.add_sequence(&stopwords.filter(&sequence));
//!     }
//!
//!     let layout = WordCloudLayout::from_frequencies(&table, &WordCloudOptions::default());
//!     layout.write_svg(std::path::Path::new("all.svg"))?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules and API
//!
//! - [`corpus`]: loads input documents; a bad file is skipped with a warning so the rest of the
//!   batch proceeds (or fails fast with the `strict` feature).
//! - [`tokenize`]: sentence and word splitting, case folding, [`tokenize::TokenSequence`] with
//!   sentence boundaries retained as sub-sequences.
//! - [`stopwords`]: an immutable [`stopwords::StopwordSet`] loaded once and passed by reference;
//!   filtering is case-insensitive and idempotent.
//! - [`stats`]: per-document counts and the aggregated [`stats::FrequencyTable`].
//! - [`lda`]: topic-model training behind the narrow [`lda::TopicModelBackend`] seam; the
//!   provided backend is a collapsed Gibbs sampler with a fixed iteration budget.
//! - [`report`]: word-cloud layout, per-topic cloud panels and the HTML report.
//!
//! ## Features and Configuration
//!
//! - `strict`: terminate on unreadable or empty input documents instead of skipping them.
//! - `optimized-str`: faster text splitting (scratch-buffer replacements, multi-pattern
//!   scanning); results are identical to the naive implementations.
//!
//! Topic modeling is configured through [`lda::LdaConfig`]: number of topics, iteration budget,
//! priors and an optional seed. Validation happens before any computation starts.
//!
//! ## Logging and Error Handling
//!
//! - Uses the `tracing` crate for progress and warnings; no subscriber is installed.
//! - Each stage owns its error type: [`corpus::InputError`], [`lda::TrainError`],
//!   [`report::RenderError`]. All failures are deterministic and surfaced directly; nothing is
//!   retried.
//!
//! ## Limitations
//!
//! - **Tokenization**: whitespace/punctuation splitting only. Siswati is agglutinative; richer
//!   morphological tokenization (separating subject concords and prefixes) would improve both
//!   frequencies and topics but is not attempted.
//! - **Stopword coverage**: the built-in list was curated from a single novel and is known to be
//!   incomplete; pass your own list for other corpora.
//! - **Aesthetics**: the word-cloud placement is a plain greedy spiral; no effort is made to
//!   produce visually polished output.

pub mod corpus;
#[cfg(test)]
mod integration_tests;
pub mod lda;
pub mod report;
pub mod stats;
pub mod stopwords;
pub mod tokenize;
