use proptest::prelude::*;

use crate::{
    lda::{self, LdaConfig, TrainError},
    report::{HtmlReport, PartReport, TopicCloudGrid, WordCloudLayout, WordCloudOptions},
    stats::{DocumentStats, FrequencyTable},
    stopwords::StopwordSet,
    tokenize::{tokenize, TokenSequence},
};

fn chapters() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "sahluko_1",
            "Imvula yana kakhulu ebusuku. Umfula wagcwala emadvolo, \
             futsi emasimi onkhe amantisa. Bantfwana babuka imvula emafasitelweni.",
        ),
        (
            "sahluko_2",
            "Lilanga laphuma ekuseni lishisa. Tinkhomo tadla etibayeni, \
             kantsi bafana bahamba nemfula baya entsabeni.",
        ),
        (
            "sahluko_3",
            "Gogo wabalisa indzaba ebusuku. Bantfwana balalela indzaba \
             yemvula neyelilanga, base balala kamnandzi.",
        ),
    ]
}

fn tokenized_chapters() -> Vec<TokenSequence> {
    chapters()
        .into_iter()
        .map(|(name, text)| tokenize(name, text))
        .collect()
}

#[test]
fn scenario_two_sentences_two_stopwords() {
    let sequence = tokenize("demo", "Ngiyakuthanda kakhulu. Live kuhle.");
    let stopwords = StopwordSet::from_words(["kakhulu", "kuhle"]);

    let filtered = stopwords.filter(&sequence);
    assert_eq!(
        filtered.tokens().collect::<Vec<_>>(),
        vec!["Ngiyakuthanda", "Live"]
    );

    let stats = DocumentStats::of(&sequence);
    assert_eq!(stats.sentences, 2);
    assert_eq!(stats.tokens, 4);
}

#[test]
fn full_pipeline_produces_consistent_artifacts() {
    let stopwords = StopwordSet::siswati();
    let sequences = tokenized_chapters();
    let filtered: Vec<_> = sequences.iter().map(|s| stopwords.filter(s)).collect();

    // statistics come from the unfiltered sequences
    for (sequence, filtered_sequence) in sequences.iter().zip(&filtered) {
        let stats = DocumentStats::of(sequence);
        assert!(stats.sentences > 0);
        assert!(stats.sentences <= stats.tokens);
        assert!(filtered_sequence.token_count() <= sequence.token_count());
        assert!(filtered_sequence.tokens().all(|t| !stopwords.contains(t)));
    }

    // aggregated frequencies cover exactly the filtered tokens
    let mut table = FrequencyTable::new();
    for filtered_sequence in &filtered {
        table.add_sequence(filtered_sequence);
    }
    let filtered_total: usize = filtered.iter().map(TokenSequence::token_count).sum();
    assert_eq!(table.total(), filtered_total as u64);

    // topic model over the filtered corpus
    let config = LdaConfig {
        topics: 3,
        max_iterations: 40,
        seed: Some(100),
        ..LdaConfig::default()
    };
    let model = lda::train(&filtered, &config).unwrap();
    assert_eq!(model.document_count(), filtered.len());
    for row in model.topic_word().iter().chain(model.doc_topic()) {
        let sum: f64 = row.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    // artifacts
    let layout = WordCloudLayout::from_frequencies(&table, &WordCloudOptions::default());
    assert!(!layout.words().is_empty());
    let cloud_svg = layout.to_svg();
    assert!(cloud_svg.contains(&*layout.words()[0].text));

    let grid = TopicCloudGrid::from_model(&model, 8);
    assert_eq!(grid.panels().len(), 3);

    let report = HtmlReport {
        title: "umbhalo".into(),
        parts: sequences
            .iter()
            .enumerate()
            .map(|(doc, sequence)| PartReport {
                stats: DocumentStats::of(sequence),
                cloud_file: format!("{}.svg", sequence.name()),
                dominant_topic: Some(PartReport::dominant_topic_of(&model, doc, 5)),
            })
            .collect(),
        topic_cloud_file: Some("topic_cloud.svg".into()),
    };
    let html = report.to_html();
    assert!(html.contains("<h1>sahluko_1</h1>"));
    assert!(html.contains("<h1>sahluko_3</h1>"));
    assert!(html.contains("topic_cloud.svg"));
}

#[test]
fn pipeline_is_reproducible_with_a_seed() {
    let stopwords = StopwordSet::siswati();
    let filtered: Vec<_> = tokenized_chapters()
        .iter()
        .map(|s| stopwords.filter(s))
        .collect();
    let config = LdaConfig {
        topics: 3,
        max_iterations: 40,
        seed: Some(7),
        ..LdaConfig::default()
    };

    let first = lda::train(&filtered, &config).unwrap();
    let second = lda::train(&filtered, &config).unwrap();
    assert_eq!(first.topic_word(), second.topic_word());
    assert_eq!(first.doc_topic(), second.doc_topic());

    let first_grid = TopicCloudGrid::from_model(&first, 8).to_svg();
    let second_grid = TopicCloudGrid::from_model(&second, 8).to_svg();
    assert_eq!(first_grid, second_grid);
}

#[test]
fn corpus_of_stopwords_only_is_insufficient_for_modeling() {
    let stopwords = StopwordSet::siswati();
    let sequence = tokenize("stopwords", "Futsi kakhulu noma kutsi lapho khona.");
    let filtered = stopwords.filter(&sequence);
    assert!(filtered.is_empty());

    let config = LdaConfig {
        topics: 2,
        seed: Some(1),
        ..LdaConfig::default()
    };
    assert!(matches!(
        lda::train(&[filtered], &config),
        Err(TrainError::InsufficientData(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        ..ProptestConfig::default()
    })]
    #[test]
    fn pipeline_invariants_hold_for_arbitrary_text(input in ".*") {
        let stopwords = StopwordSet::siswati();
        let sequence = tokenize("prop", &input);

        prop_assert!(sequence.sentence_count() <= sequence.token_count());

        let filtered = stopwords.filter(&sequence);
        prop_assert!(filtered.tokens().all(|t| !stopwords.contains(t)));

        // filtering an already filtered sequence changes nothing
        prop_assert_eq!(&stopwords.filter(&filtered), &filtered);

        let table = FrequencyTable::from_sequence(&filtered);
        prop_assert_eq!(table.total(), filtered.token_count() as u64);
    }
}
