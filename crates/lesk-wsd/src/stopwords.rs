use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

/// Lower-cased stopword set, one entry per line of the source file.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

#[derive(Debug, Error)]
pub enum StopwordsError {
    #[error("failed to read stopword file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StopWords {
    /// Read a stopword file. Blank lines and `#` comments are skipped.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StopwordsError> {
        let path_ref = path.as_ref();
        let io_err = |source| StopwordsError::Io {
            path: path_ref.to_path_buf(),
            source,
        };

        let file = File::open(path_ref).map_err(io_err)?;
        let mut words = HashSet::new();
        for line in BufReader::new(file).lines() {
            let raw = line.map_err(io_err)?;
            let word = raw.trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }
            words.insert(word.to_lowercase());
        }

        info!("loaded {} stopwords from {}", words.len(), path_ref.display());
        Ok(Self { words })
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Case-insensitive membership.
    pub fn contains(&self, word: &str) -> bool {
        if word.chars().any(char::is_uppercase) {
            self.words.contains(&word.to_lowercase())
        } else {
            self.words.contains(word)
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_one_word_per_line() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "# common words").unwrap();
        writeln!(file, "The").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  of  ").unwrap();
        let stopwords = StopWords::load(file.path()).expect("load stopwords");
        assert_eq!(stopwords.len(), 2);
        assert!(stopwords.contains("the"));
        assert!(stopwords.contains("THE"));
        assert!(stopwords.contains("of"));
        assert!(!stopwords.contains("bank"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = StopWords::load("/definitely/not/here/stopwords.txt").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("/definitely/not/here/stopwords.txt"), "{msg}");
    }

    #[test]
    fn from_words_normalizes() {
        let stopwords = StopWords::from_words(["A", " an ", ""]);
        assert_eq!(stopwords.len(), 2);
        assert!(stopwords.contains("a"));
        assert!(stopwords.contains("an"));
    }
}
