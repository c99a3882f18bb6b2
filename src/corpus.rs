use std::{
    fs, io,
    path::{Path, PathBuf},
};

use compact_str::CompactString;

/// Errors at the input boundary of the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to read `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The document produced no word tokens at all.
    #[error("document `{0}` is empty after tokenization")]
    Empty(CompactString),
}

/// A single input document: an identifier plus its raw UTF-8 text.
///
/// Immutable once loaded; the tokenizer consumes the text by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: CompactString,
    pub text: String,
}

impl Document {
    pub fn new(name: impl Into<CompactString>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Read a document from a text file. The document name is the file stem.
    pub fn from_file(path: &Path) -> Result<Self, InputError> {
        let text = fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_stem()
            .map(|stem| CompactString::from(stem.to_string_lossy()))
            .unwrap_or_else(|| CompactString::from("document"));

        Ok(Self { name, text })
    }
}

/// The ordered collection of documents analysed together.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Load a corpus from text files.
    ///
    /// An unreadable file is skipped with a warning and the rest of the
    /// batch proceeds. With the `strict` feature the first failure is
    /// returned instead.
    pub fn from_paths(paths: &[PathBuf]) -> Result<Self, InputError> {
        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            match Document::from_file(path) {
                Ok(document) => {
                    tracing::debug!(name = %document.name, bytes = document.text.len(), "loaded document");
                    documents.push(document);
                }
                Err(error) => {
                    if cfg!(feature = "strict") {
                        return Err(error);
                    }
                    tracing::warn!(%error, "skipping unreadable document");
                }
            }
        }
        Ok(Self { documents })
    }

    /// A synthetic document concatenating every document's text, named
    /// `"all"`. Analysed alongside the individual parts.
    pub fn combined(&self) -> Document {
        let mut text = String::with_capacity(
            self.documents.iter().map(|d| d.text.len() + 1).sum::<usize>(),
        );
        for document in &self.documents {
            text.push_str(&document.text);
            text.push('\n'); /* keep a sentence boundary between parts */
        }
        Document::new("all", text)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl IntoIterator for Corpus {
    type Item = Document;
    type IntoIter = std::vec::IntoIter<Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_an_input_error() {
        let result = Document::from_file(Path::new("/nonexistent/akukho.txt"));
        assert!(matches!(result, Err(InputError::Io { .. })));
    }

    #[test]
    fn test_from_file_uses_file_stem_as_name() {
        let dir = std::env::temp_dir().join(format!("lulwimi-corpus-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sahluko_1.txt");
        fs::write(&path, "Live kuhle.").unwrap();

        let document = Document::from_file(&path).unwrap();
        assert_eq!(document.name, "sahluko_1");
        assert_eq!(document.text, "Live kuhle.");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_combined_joins_all_parts() {
        let corpus = Corpus::new(vec![
            Document::new("one", "Live kuhle."),
            Document::new("two", "Siyabonga kakhulu."),
        ]);

        let combined = corpus.combined();
        assert_eq!(combined.name, "all");
        assert!(combined.text.contains("Live kuhle."));
        assert!(combined.text.contains("Siyabonga kakhulu."));
    }

    #[test]
    fn test_missing_files_are_skipped_in_batch() {
        // only meaningful without the strict feature
        if cfg!(feature = "strict") {
            return;
        }

        let dir = std::env::temp_dir().join(format!("lulwimi-batch-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let good = dir.join("good.txt");
        fs::write(&good, "Live kuhle.").unwrap();

        let corpus =
            Corpus::from_paths(&[good.clone(), dir.join("akukho.txt")]).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.documents()[0].name, "good");

        fs::remove_dir_all(&dir).unwrap();
    }
}
