use std::{
    fmt::Write as _,
    io,
    path::{Path, PathBuf},
};

use compact_str::CompactString;

use crate::{
    lda::TopicModel,
    stats::{DocumentStats, FrequencyTable},
};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to write `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// matplotlib's tab10 cycle
const PALETTE: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

// advancing the spiral by more than this many steps without finding a free
// spot means the word cannot be placed on this canvas
const MAX_SPIRAL_STEPS: usize = 4000;

#[derive(Debug, Clone)]
pub struct WordCloudOptions {
    pub width: f64,
    pub height: f64,
    pub max_words: usize,
    pub min_font_size: f64,
    pub max_font_size: f64,
}

impl Default for WordCloudOptions {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 700.0,
            max_words: 200,
            min_font_size: 12.0,
            max_font_size: 72.0,
        }
    }
}

impl WordCloudOptions {
    /// Smaller canvas used for the per-topic panels.
    pub fn panel() -> Self {
        Self {
            width: 400.0,
            height: 280.0,
            max_words: 10,
            min_font_size: 11.0,
            max_font_size: 38.0,
        }
    }
}

/// A word placed on the cloud canvas. `x`/`y` is the top-left corner of the
/// word's bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: CompactString,
    pub weight: f64,
    pub font_size: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlacedWord {
    fn overlaps(&self, other: &PlacedWord, gap: f64) -> bool {
        self.x < other.x + other.width + gap
            && other.x < self.x + self.width + gap
            && self.y < other.y + other.height + gap
            && other.y < self.y + self.height + gap
    }
}

/// A deterministic, non-overlapping word-cloud layout.
///
/// Words are placed in order of decreasing weight on an archimedean spiral
/// around the canvas centre; a word that finds no free spot is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct WordCloudLayout {
    width: f64,
    height: f64,
    words: Vec<PlacedWord>,
}

impl WordCloudLayout {
    pub fn from_frequencies(table: &FrequencyTable, options: &WordCloudOptions) -> Self {
        let entries = table
            .sorted()
            .into_iter()
            .map(|(token, count)| (token, count as f64))
            .collect();
        Self::from_weights(entries, options)
    }

    /// Lay out arbitrary weighted words, e.g. a topic's word distribution.
    pub fn from_weights(
        mut entries: Vec<(CompactString, f64)>,
        options: &WordCloudOptions,
    ) -> Self {
        entries.retain(|(_, weight)| *weight > 0.0);
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        entries.truncate(options.max_words);

        let mut layout = Self {
            width: options.width,
            height: options.height,
            words: Vec::with_capacity(entries.len()),
        };

        let Some(&(_, max_weight)) = entries.first() else {
            return layout;
        };

        for (text, weight) in entries {
            let ratio = (weight / max_weight).sqrt();
            let font_size =
                options.min_font_size + (options.max_font_size - options.min_font_size) * ratio;
            // rough glyph metrics for a sans-serif face
            let width = 0.6 * font_size * text.chars().count() as f64 + 4.0;
            let height = 1.2 * font_size;

            if let Some((x, y)) = layout.find_spot(width, height) {
                layout.words.push(PlacedWord {
                    text,
                    weight,
                    font_size,
                    x,
                    y,
                    width,
                    height,
                });
            } else {
                tracing::debug!(word = %text, "no free spot on the canvas, dropping word");
            }
        }

        layout
    }

    fn find_spot(&self, width: f64, height: f64) -> Option<(f64, f64)> {
        let centre_x = self.width / 2.0;
        let centre_y = self.height / 2.0;

        for step in 0..MAX_SPIRAL_STEPS {
            let theta = 0.3 * step as f64;
            let radius = 2.0 * theta / std::f64::consts::TAU;
            let x = centre_x + radius * theta.cos() - width / 2.0;
            let y = centre_y + radius * theta.sin() - height / 2.0;

            if x < 0.0 || y < 0.0 || x + width > self.width || y + height > self.height {
                continue;
            }

            let candidate = PlacedWord {
                text: CompactString::default(),
                weight: 0.0,
                font_size: 0.0,
                x,
                y,
                width,
                height,
            };
            if self.words.iter().all(|placed| !placed.overlaps(&candidate, 2.0)) {
                return Some((x, y));
            }
        }

        None
    }

    pub fn words(&self) -> &[PlacedWord] {
        &self.words
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn to_svg(&self) -> String {
        let mut svg = svg_open(self.width, self.height);
        for (i, word) in self.words.iter().enumerate() {
            svg_text(&mut svg, word, PALETTE[i % PALETTE.len()]);
        }
        svg.push_str("</svg>\n");
        svg
    }

    pub fn write_svg(&self, path: &Path) -> Result<(), RenderError> {
        write_artifact(path, &self.to_svg())
    }
}

/// One word-cloud panel per topic, each in a single colour, arranged in a
/// two-column grid.
#[derive(Debug, Clone)]
pub struct TopicCloudGrid {
    panel_width: f64,
    panel_height: f64,
    panels: Vec<WordCloudLayout>,
}

impl TopicCloudGrid {
    pub fn from_model(model: &TopicModel, words_per_topic: usize) -> Self {
        let options = WordCloudOptions {
            max_words: words_per_topic,
            ..WordCloudOptions::panel()
        };

        let panels = (0..model.topic_count())
            .map(|topic| {
                let entries = model
                    .top_words(topic, words_per_topic)
                    .into_iter()
                    .map(|(word, weight)| (CompactString::from(word), weight))
                    .collect();
                WordCloudLayout::from_weights(entries, &options)
            })
            .collect();

        Self {
            panel_width: options.width,
            panel_height: options.height,
            panels,
        }
    }

    pub fn panels(&self) -> &[WordCloudLayout] {
        &self.panels
    }

    pub fn to_svg(&self) -> String {
        const COLUMNS: usize = 2;
        const TITLE_BAND: f64 = 28.0;

        let rows = self.panels.len().div_ceil(COLUMNS);
        let total_width = self.panel_width * COLUMNS as f64;
        let total_height = (self.panel_height + TITLE_BAND) * rows as f64;

        let mut svg = svg_open(total_width, total_height.max(1.0));
        for (topic, panel) in self.panels.iter().enumerate() {
            let origin_x = (topic % COLUMNS) as f64 * self.panel_width;
            let origin_y = (topic / COLUMNS) as f64 * (self.panel_height + TITLE_BAND);
            let colour = PALETTE[topic % PALETTE.len()];

            let _ = write!(
                svg,
                "<g transform=\"translate({origin_x},{origin_y})\">\n\
                 <text x=\"{x}\" y=\"20\" font-family=\"sans-serif\" font-size=\"16\" \
                 font-weight=\"bold\" fill=\"{colour}\" text-anchor=\"middle\">Topic {topic}</text>\n",
                x = self.panel_width / 2.0,
            );
            for word in panel.words() {
                let mut shifted = word.clone();
                shifted.y += TITLE_BAND;
                svg_text(&mut svg, &shifted, colour);
            }
            svg.push_str("</g>\n");
        }
        svg.push_str("</svg>\n");
        svg
    }

    pub fn write_svg(&self, path: &Path) -> Result<(), RenderError> {
        write_artifact(path, &self.to_svg())
    }
}

/// Everything the report shows about one analysed part.
#[derive(Debug, Clone)]
pub struct PartReport {
    pub stats: DocumentStats,
    /// Relative path of the part's word-cloud image.
    pub cloud_file: String,
    /// Dominant topic id, its proportion and the topic's keywords.
    pub dominant_topic: Option<(usize, f64, String)>,
}

impl PartReport {
    /// Compose the dominant-topic row for a document from a trained model.
    pub fn dominant_topic_of(model: &TopicModel, doc: usize, keywords: usize) -> (usize, f64, String) {
        let (topic, proportion) = model.dominant_topic(doc);
        let keywords = model
            .top_words(topic, keywords)
            .into_iter()
            .map(|(word, _)| word)
            .collect::<Vec<_>>()
            .join(", ");
        (topic, proportion, keywords)
    }
}

/// The HTML summary of a whole analysis run.
#[derive(Debug, Clone)]
pub struct HtmlReport {
    pub title: String,
    pub parts: Vec<PartReport>,
    /// Relative path of the per-topic cloud grid, if topic modeling ran.
    pub topic_cloud_file: Option<String>,
}

impl HtmlReport {
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html>\n<head>\n\
             <meta charset=\"utf-8\">\n\
             <title>Analysis of document: {title}</title>\n\
             <style>\n\
             body {{background-color: powderblue;}}\n\
             h1   {{color: blue;}}\n\
             table, th, td {{border: 1px solid black; border-collapse: collapse; padding: 4px;}}\n\
             </style>\n\
             </head>\n<body>\n",
            title = escape(&self.title),
        );

        for part in &self.parts {
            let _ = write!(
                html,
                "<h1>{name}</h1>\n\
                 <ul class=\"numbers\">\n\
                 <li>number of sentences: {sentences}</li>\n\
                 <li>number of tokens: {tokens}</li>\n\
                 <li>tokens per sentence: {per_sentence:.2}</li>\n\
                 </ul>\n\
                 <div class=\"wordcloud\"><img src=\"{cloud}\" alt=\"word cloud of {name}\"></div>\n",
                name = escape(&part.stats.name),
                sentences = part.stats.sentences,
                tokens = part.stats.tokens,
                per_sentence = part.stats.tokens_per_sentence(),
                cloud = escape(&part.cloud_file),
            );

            if let Some((topic, proportion, keywords)) = &part.dominant_topic {
                let _ = write!(
                    html,
                    "<div class=\"topic_doc\"><table>\n\
                     <tr><th>topic</th><th>percentage</th><th>words</th></tr>\n\
                     <tr><td>{topic}</td><td>{proportion:.4}</td><td>{keywords}</td></tr>\n\
                     </table></div>\n",
                    keywords = escape(keywords),
                );
            }
        }

        if let Some(topic_cloud) = &self.topic_cloud_file {
            let _ = write!(
                html,
                "<div class=\"topic_cloud\"><img src=\"{}\" alt=\"topic word clouds\"></div>\n",
                escape(topic_cloud),
            );
        }

        let _ = write!(
            html,
            "<p class=\"generated\">generated {}</p>\n</body>\n</html>\n",
            chrono::Utc::now().format("%Y-%m-%d %H:%M UTC"),
        );
        html
    }

    pub fn write_html(&self, path: &Path) -> Result<(), RenderError> {
        write_artifact(path, &self.to_html())
    }
}

fn svg_open(width: f64, height: f64) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
         viewBox=\"0 0 {width} {height}\">\n\
         <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n",
    );
    svg
}

fn svg_text(svg: &mut String, word: &PlacedWord, colour: &str) {
    // the y attribute is the text baseline, approximated from the box top
    let _ = write!(
        svg,
        "<text x=\"{x:.1}\" y=\"{y:.1}\" font-family=\"sans-serif\" font-size=\"{size:.1}\" \
         fill=\"{colour}\">{text}</text>\n",
        x = word.x,
        y = word.y + word.font_size,
        size = word.font_size,
        text = escape(&word.text),
    );
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn write_artifact(path: &Path, content: &str) -> Result<(), RenderError> {
    std::fs::write(path, content).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = content.len(), "wrote artifact");
    Ok(())
}
