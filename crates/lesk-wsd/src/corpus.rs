//! Test corpora: annotated sentences with labelled ambiguous words.
//!
//! A corpus file repeats three kinds of lines:
//!
//! ```text
//! The river bank was flooded .
//! 1
//! 2 bank NOUN bank%1:17:01::,bank%1:17:00::
//! ```
//!
//! a raw sentence, the number `N` of ambiguous words in it, then `N` lines of
//! `<position> <lemma> <POS> <sense keys>`. Positions are 0-based token
//! indices into the annotated sentence and keys are comma-separated. Blank
//! lines between records are ignored, so a sentence line must not be empty.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};

use crate::annotator::Annotator;
use crate::signature::Target;
use crate::text::{PosTag, Sentence};

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}:{line}: {reason}", path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

/// One labelled word: where it is, what it is, which senses are correct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AmbiguousOccurrence {
    /// Index into [`Corpus::sentences`].
    pub sentence: usize,
    pub position: usize,
    pub target: Target,
    /// Any of these keys counts as correct.
    pub ground_truth: BTreeSet<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Corpus {
    sentences: Vec<Sentence>,
    occurrences: Vec<AmbiguousOccurrence>,
}

impl Corpus {
    pub fn load(path: impl AsRef<Path>, annotator: &dyn Annotator) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        let start = Instant::now();
        let text = fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let corpus = Self::parse(&text, path, annotator)?;
        info!(
            "loaded {} sentences, {} ambiguous words from {} in {} ms",
            corpus.sentences.len(),
            corpus.occurrences.len(),
            path.display(),
            start.elapsed().as_millis()
        );
        Ok(corpus)
    }

    /// Parse corpus text; `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path, annotator: &dyn Annotator) -> Result<Self, CorpusError> {
        let malformed = |line: usize, reason: String| CorpusError::Malformed {
            path: path.to_path_buf(),
            line,
            reason,
        };

        let mut lines = text.lines().enumerate().map(|(idx, line)| (idx + 1, line));
        let mut corpus = Corpus::default();

        loop {
            let mut blank_before = None;
            let Some((sentence_line, raw)) = lines.by_ref().find(|(lineno, line)| {
                let blank = line.trim().is_empty();
                if blank {
                    blank_before = Some(*lineno);
                }
                !blank
            }) else {
                break;
            };
            // A bare count after a blank line, followed by something that is
            // not a count, means the record's sentence line was left empty.
            if let Some(blank_line) = blank_before
                && raw.trim().parse::<usize>().is_ok()
                && lines
                    .clone()
                    .next()
                    .is_some_and(|(_, next)| next.trim().parse::<usize>().is_err())
            {
                return Err(malformed(blank_line, "empty sentence line".into()));
            }
            let sentence_idx = corpus.sentences.len();
            let mut tokens = annotator.annotate_line(raw).into_tokens();

            let Some((count_line, count_raw)) = lines.next() else {
                return Err(malformed(
                    sentence_line,
                    "missing occurrence count after sentence".into(),
                ));
            };
            let count: usize = count_raw.trim().parse().map_err(|_| {
                malformed(
                    count_line,
                    format!("expected an occurrence count, found `{}`", count_raw.trim()),
                )
            })?;

            for _ in 0..count {
                let Some((lineno, record)) = lines.next() else {
                    return Err(malformed(
                        count_line,
                        format!("expected {count} occurrence lines, file ended early"),
                    ));
                };
                let occurrence = parse_occurrence(record, sentence_idx, tokens.len())
                    .map_err(|reason| malformed(lineno, reason))?;

                let token = tokens[occurrence.position].clone();
                tokens[occurrence.position] = token
                    .with_lemma(occurrence.target.lemma.clone())
                    .with_pos(occurrence.target.pos.clone());
                corpus.occurrences.push(occurrence);
            }

            corpus.sentences.push(Sentence::new(tokens));
        }

        Ok(corpus)
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn occurrences(&self) -> &[AmbiguousOccurrence] {
        &self.occurrences
    }

    pub fn sentence(&self, occurrence: &AmbiguousOccurrence) -> Option<&Sentence> {
        self.sentences.get(occurrence.sentence)
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }
}

fn parse_occurrence(
    record: &str,
    sentence: usize,
    sentence_len: usize,
) -> Result<AmbiguousOccurrence, String> {
    let fields: Vec<&str> = record.split_whitespace().collect();
    let [position, lemma, pos, keys] = fields.as_slice() else {
        return Err(format!(
            "expected `<position> <lemma> <POS> <sense keys>`, found {} fields",
            fields.len()
        ));
    };
    let position: usize = position
        .parse()
        .map_err(|_| format!("invalid token position `{position}`"))?;
    if position >= sentence_len {
        return Err(format!(
            "position {position} is outside a sentence of {sentence_len} tokens"
        ));
    }
    let pos = PosTag::parse(pos);
    if pos.wordnet_pos().is_none() {
        warn!("ambiguous word `{lemma}` has tag {pos}; it will get no senses");
    }
    let ground_truth = parse_sense_keys(keys);
    if ground_truth.is_empty() {
        return Err(format!("no ground-truth sense keys for `{lemma}`"));
    }
    Ok(AmbiguousOccurrence {
        sentence,
        position,
        target: Target::new(*lemma, pos),
        ground_truth,
    })
}

/// Split a comma-separated key list; empty items are dropped.
pub fn parse_sense_keys(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}
