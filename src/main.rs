use std::fs;
use std::path::PathBuf;

use clap::Parser;

use lulwimi::corpus::{Corpus, InputError};
use lulwimi::lda;
use lulwimi::report::{HtmlReport, PartReport, TopicCloudGrid, WordCloudLayout, WordCloudOptions};
use lulwimi::stats::{DocumentStats, FrequencyTable};
use lulwimi::stopwords::StopwordSet;
use lulwimi::tokenize;

/// Analyse Siswati text documents: token and sentence counts, word clouds
/// and LDA topic modeling, summarized in an HTML report.
#[derive(Debug, clap::Parser)]
struct CommandLine {
    /// Input text files, e.g. the chapters of a book
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,
    /// Directory the artifacts are written to (created if missing)
    #[arg(short, long)]
    output_dir: PathBuf,
    /// Base of the report file name
    #[arg(short, long)]
    base: String,
    /// File with stopwords; defaults to the built-in Siswati list
    #[arg(short, long)]
    stopwords: Option<PathBuf>,
    /// Number of topics to model
    #[arg(long, default_value_t = 10)]
    topics: usize,
    /// Sampling passes for topic modeling
    #[arg(long, default_value_t = 100)]
    iterations: usize,
    /// Random seed for a reproducible topic model
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    let args: CommandLine = CommandLine::parse();

    let stopwords = match &args.stopwords {
        Some(path) => StopwordSet::from_file(path).expect("failed to load stopword list"),
        None => StopwordSet::siswati(),
    };

    fs::create_dir_all(&args.output_dir).expect("failed to create output directory");

    let corpus = Corpus::from_paths(&args.input).expect("failed to load input files");
    assert!(!corpus.is_empty(), "no readable input documents");

    // Part 0 is the concatenation of all parts, followed by each part.
    let mut parts = vec![corpus.combined()];
    parts.extend(corpus);

    let mut sequences = Vec::with_capacity(parts.len());
    for document in &parts {
        let sequence = tokenize::tokenize(&document.name, &document.text);
        if sequence.is_empty() {
            let error = InputError::Empty(document.name.clone());
            if cfg!(feature = "strict") {
                panic!("{error}");
            }
            eprintln!("warning: {error}, skipping");
            continue;
        }
        sequences.push(sequence);
    }
    assert!(!sequences.is_empty(), "no input document produced any tokens");

    let filtered: Vec<_> = sequences.iter().map(|s| stopwords.filter(s)).collect();

    let config = lda::LdaConfig {
        topics: args.topics,
        max_iterations: args.iterations,
        seed: args.seed,
        ..lda::LdaConfig::default()
    };
    let model = lda::train(&filtered, &config).expect("topic modeling failed");

    let cloud_options = WordCloudOptions::default();
    let mut part_reports = Vec::with_capacity(sequences.len());
    for (doc, (sequence, filtered_sequence)) in sequences.iter().zip(&filtered).enumerate() {
        let table = FrequencyTable::from_sequence(filtered_sequence);
        let layout = WordCloudLayout::from_frequencies(&table, &cloud_options);

        let cloud_file = format!("{}.svg", sequence.name());
        layout
            .write_svg(&args.output_dir.join(&cloud_file))
            .expect("failed to write word cloud");

        part_reports.push(PartReport {
            stats: DocumentStats::of(sequence),
            cloud_file,
            dominant_topic: Some(PartReport::dominant_topic_of(&model, doc, 10)),
        });
    }

    let topic_cloud_file = "topic_cloud.svg".to_string();
    TopicCloudGrid::from_model(&model, 10)
        .write_svg(&args.output_dir.join(&topic_cloud_file))
        .expect("failed to write topic clouds");

    let report = HtmlReport {
        title: args.base.clone(),
        parts: part_reports,
        topic_cloud_file: Some(topic_cloud_file),
    };
    let report_path = args.output_dir.join(format!("{}.html", args.base));
    report.write_html(&report_path).expect("failed to write report");

    eprintln!("report written to {}", report_path.display());
}
