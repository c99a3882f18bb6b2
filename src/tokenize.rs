use aho_corasick::{AhoCorasick, AhoCorasickBuilder};
use compact_str::CompactString;
use memchr::memmem;
use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::LazyLock;

/// Replace all occurrences of `from` with `to` in `input`.
///
/// This function is optimized for the case where no replacements are made.
///
/// # Arguments
///
/// * `input` - The input string to search for replacements.
/// * `from` - The `Finder` to search for. Must be created from valid UTF-8.
/// * `to` - The string to replace `from` with.
/// * `scratch_buffer` - A buffer to store the result in. Is expected to be empty.
///
/// # Returns
///
/// A tuple containing the modified `input` and the `clear`ed `scratch_buffer`.
fn str_replace_opt(
    input: String,
    from: &memmem::Finder,
    to: &str,
    scratch_buffer: String,
) -> (String, String) {
    let mut _ignored = false;
    str_replace_opt_ext(input, from, to, scratch_buffer, &mut _ignored)
}

fn str_replace_opt_ext(
    mut input: String,
    from: &memmem::Finder,
    to: &str,
    scratch_buffer: String,
    did_replace: &mut bool,
) -> (String, String) {
    let mut result = scratch_buffer;
    let mut last_end = 0;
    for m in from.find_iter(input.as_bytes()) {
        let start = m;
        let end = start + from.needle().len();

        // string indexing could panic if the Finder is not valid UTF-8
        result.push_str(&input[last_end..start]);
        result.push_str(to);

        last_end = end;
    }

    if last_end == 0 {
        // no replacements were made
        *did_replace = false;
        // no need to clear the scratch buffer, since it's already empty
        (input, result)
    } else {
        *did_replace = true;

        // copy the remaining text
        result.push_str(&input[last_end..]);

        input.clear();
        (result, input)
    }
}

macro_rules! finder {
    ($needle:expr) => {{
        static FINDER: LazyLock<memmem::Finder> =
            LazyLock::new(|| memmem::Finder::new($needle.as_bytes()));
        &FINDER
    }};
}

/// Find all `regex` matches in `input` and replace them with the result of `replacement`.
///
/// Optimized for the case where no replacements are made.
fn regex_replace_opt<R: regex::Replacer>(
    mut input: String,
    regex: &Regex,
    mut replacement: R,
    scratch_buffer: String,
) -> (String, String) {
    let mut capt_iter = regex.captures_iter(&input).peekable();

    if capt_iter.peek().is_none() {
        // no matches found, return early

        // no need to clear the scratch buffer, since it's already empty
        (input, scratch_buffer)
    } else {
        let mut result = scratch_buffer;
        let mut last_end = 0;
        for cap in capt_iter {
            let m = cap.get(0).unwrap();
            let start = m.start();
            let end = m.end();

            result.push_str(&input[last_end..start]);
            replacement.replace_append(&cap, &mut result);

            last_end = end;
        }

        // copy the remaining text
        result.push_str(&input[last_end..]);

        input.clear();
        (result, input)
    }
}

// marker inserted at sentence boundaries before splitting
const BREAK: &str = "@@@@";

// A full stop only ends a sentence after a word of at least three characters,
// so initials and abbreviations ("J. Dlamini", "e.g. ") stay attached.
static REGEX_STOP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\s\.][^\s\.][^\s\.]\.) ").unwrap());

/// Split the input text into sentences.
///
/// Sentence boundaries are newlines and `. `/`? `/`! ` after a word.
/// Returned segments are untrimmed and may be empty; callers filter.
///
/// # Arguments
///
/// * `text` - The input text to split.
/// * `scratch_buffers` - A tuple containing two scratch buffers to use for temporary storage.
///                       They must be empty and will again be empty after the function returns.
///                       They should be reused across multiple calls to this function.
pub fn split_into_sentences(
    text: &str,
    scratch_buffers: (&mut String, &mut String),
) -> Vec<String> {
    if cfg!(feature = "optimized-str") {
        split_into_sentences_optimized(text, scratch_buffers)
    } else {
        split_into_sentences_naive(text)
    }
}

#[doc(hidden)] /* only public for benchmarking */
pub fn split_into_sentences_naive(text: &str) -> Vec<String> {
    let text = text.replace("\n", "\n@@@@");
    let text = REGEX_STOP.replace_all(&text, "$1@@@@");
    let text = text.replace("? ", "?@@@@");
    let text = text.replace("! ", "!@@@@");

    let mut text = text;
    while text.contains("@@@@@@@@") {
        text = text.replace("@@@@@@@@", "@@@@");
    }

    text.split(BREAK).map(|s| s.to_string()).collect()
}

#[doc(hidden)] /* only public for benchmarking */
pub fn split_into_sentences_optimized(
    text: &str,
    scratch_buffers: (&mut String, &mut String),
) -> Vec<String> {
    scratch_buffers.0.push_str(text);

    let (text, scratch_buffer) = (
        std::mem::take(scratch_buffers.0),
        std::mem::take(scratch_buffers.1),
    );

    let (text, scratch_buffer) = str_replace_opt(text, finder!("\n"), "\n@@@@", scratch_buffer);

    let (text, scratch_buffer) = regex_replace_opt(text, &REGEX_STOP, "$1@@@@", scratch_buffer);

    let (text, scratch_buffer) = str_replace_opt(text, finder!("? "), "?@@@@", scratch_buffer);
    let (text, scratch_buffer) = str_replace_opt(text, finder!("! "), "!@@@@", scratch_buffer);

    let (mut text, mut scratch_buffer) = (text, scratch_buffer);

    let mut did_replace = true;
    while did_replace {
        (text, scratch_buffer) = str_replace_opt_ext(
            text,
            finder!("@@@@@@@@"),
            "@@@@",
            scratch_buffer,
            &mut did_replace,
        );
    }

    let result = text.split(BREAK).map(|s| s.to_string()).collect();

    text.clear();
    // scratch_buffer is already empty

    *scratch_buffers.0 = text;
    *scratch_buffers.1 = scratch_buffer;

    result
}

// every pattern is a single character, so the naive and corasick
// implementations agree exactly
const SEPARATORS: &[&str] = &[
    " ", "\n", "\t", "\r", ".", ",", ";", ":", "?", "!", "-", "_", "/", "\\", "(", ")", "[", "]",
    "{", "}", "*", "#", "@", "&", "=", "+", "%", "~", "$", "^", "<", ">", "\"", "'", "´", "`",
    "’", "‘", "“", "”", "«", "»", "–", "—", "…", "¡", "¿", "|", "§", "©", "®", "™",
];

static SEPARATOR_CHARS: LazyLock<FxHashSet<char>> = LazyLock::new(|| {
    SEPARATORS
        .iter()
        .map(|s| {
            let mut chars = s.chars();
            let c = chars.next().unwrap();
            debug_assert!(chars.next().is_none());
            c
        })
        .collect()
});

/// Split the input text into word tokens.
///
/// Tokens are maximal runs between separator characters (whitespace and
/// punctuation). Separator characters themselves are discarded; runs are
/// returned as-is, including runs that contain digits or symbols outside
/// the separator list.
pub fn split_into_words(text: &str) -> Vec<String> {
    if cfg!(feature = "optimized-str") {
        split_into_words_corasick(text)
    } else {
        split_into_words_naive(text)
    }
}

#[doc(hidden)] /* only public for benchmarking */
pub fn split_into_words_naive(text: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if SEPARATOR_CHARS.contains(&c) {
            if !current.is_empty() {
                result.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        result.push(current);
    }

    result
}

#[doc(hidden)] /* only public for benchmarking */
pub fn split_into_words_corasick(text: &str) -> Vec<String> {
    static AHO_CORASICK: LazyLock<AhoCorasick> = LazyLock::new(|| {
        let mut builder = AhoCorasickBuilder::new();
        builder.match_kind(aho_corasick::MatchKind::LeftmostFirst);
        let aho_corasick = builder.build(SEPARATORS).unwrap();
        tracing::debug!(
            "built aho-corasick successfully, kind: {:?}",
            aho_corasick.kind()
        );
        aho_corasick
    });

    let mut result = Vec::new();

    let mut last_end = 0;
    for m in AHO_CORASICK.find_iter(text) {
        let start = m.start();
        let end = m.end();

        // collect text between separators (i.e. words)
        if start > last_end {
            result.push(text[last_end..start].to_string());
        }

        last_end = end;
    }

    if last_end < text.len() {
        // collect remaining text (last word)
        result.push(text[last_end..].to_string());
    }

    result
}

/// Whether a token is a word proper: non-empty and entirely alphabetic.
///
/// Runs with digits or symbols outside the separator list are not words
/// and are excluded from analysis.
pub fn is_word(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic)
}

pub fn to_lowercase(input: &str) -> String {
    if cfg!(feature = "optimized-str") {
        to_lowercase_opt(input)
    } else {
        // Siswati is written in the Latin script with very little unicode, so this is probably faster
        input.to_lowercase()
    }
}

#[doc(hidden)] /* only public for benchmarking */
pub fn to_lowercase_opt(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for c in input.chars() {
        match unicode_case_mapping::to_lowercase(c) {
            [0, 0] => result.push(c),
            [l, 0] => result.push(char::from_u32(l).unwrap()),
            [l, l2] => {
                result.push(char::from_u32(l).unwrap());
                result.push(char::from_u32(l2).unwrap());
            }
        }
    }
    result
}

/// An ordered sequence of word tokens derived from one document, with
/// sentence boundaries retained as sub-sequences.
///
/// Produced by [`tokenize`]; the stopword filter consumes a sequence and
/// produces a new, filtered one. Sentences that end up with no word tokens
/// are not tracked, so `sentence_count() <= token_count()` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSequence {
    name: CompactString,
    sentences: Vec<Vec<CompactString>>,
}

impl TokenSequence {
    pub fn new(name: CompactString, sentences: Vec<Vec<CompactString>>) -> Self {
        debug_assert!(sentences.iter().all(|s| !s.is_empty()));
        Self { name, sentences }
    }

    /// Name of the document this sequence was derived from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sentences(&self) -> &[Vec<CompactString>] {
        &self.sentences
    }

    /// All word tokens in order, ignoring sentence boundaries.
    pub fn tokens(&self) -> impl Iterator<Item = &CompactString> {
        self.sentences.iter().flatten()
    }

    pub fn token_count(&self) -> usize {
        self.sentences.iter().map(Vec::len).sum()
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Tokenize a document's text into a [`TokenSequence`].
///
/// The text is split into sentences, each sentence into word tokens;
/// non-word runs are dropped. An empty document yields an empty sequence.
pub fn tokenize(name: &str, text: &str) -> TokenSequence {
    let mut scratch_buffers = (String::new(), String::new());
    let sentences = split_into_sentences(text, (&mut scratch_buffers.0, &mut scratch_buffers.1));

    let sentences = sentences
        .into_iter()
        .map(|sentence| {
            split_into_words(&sentence)
                .into_iter()
                .filter(|t| is_word(t))
                .map(CompactString::from)
                .collect::<Vec<_>>()
        })
        .filter(|tokens| !tokens.is_empty()) /* don't track empty sentences */
        .collect();

    TokenSequence::new(CompactString::from(name), sentences)
}
