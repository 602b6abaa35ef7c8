//! Linguistic annotation: raw text to tokenized, optionally lemmatized and
//! POS-tagged sentences.

use std::sync::Arc;

use wordnet_db::WordNet;
use wordnet_morphy::Morphy;
use wordnet_types::Pos;

use crate::text::{Sentence, Token, ends_sentence, tokenize};

/// Turns one raw line of text into sentences.
///
/// Implementations are shared across worker threads and must answer
/// concurrent read-only calls.
pub trait Annotator: Send + Sync {
    fn annotate(&self, raw: &str) -> Vec<Sentence>;

    /// All sentences of `raw` joined, so token positions are line-relative.
    fn annotate_line(&self, raw: &str) -> Sentence {
        Sentence::concat(self.annotate(raw))
    }
}

/// Tokenization and sentence splitting only; tokens carry no lemma or POS.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainAnnotator;

impl Annotator for PlainAnnotator {
    fn annotate(&self, raw: &str) -> Vec<Sentence> {
        split_sentences(tokenize(raw).into_iter().map(Token::new))
    }
}

/// Lemmatizes and tags words from the WordNet lexicon.
///
/// Each word is run through morphy for noun, verb, adjective and adverb in
/// that order; the POS whose lemma has the most tagged senses wins, ties going
/// to the earlier POS. Words WordNet does not know keep only their surface
/// form.
pub struct LexiconAnnotator {
    wordnet: Arc<WordNet>,
    morphy: Arc<Morphy>,
}

impl LexiconAnnotator {
    pub fn new(wordnet: Arc<WordNet>, morphy: Arc<Morphy>) -> Self {
        Self { wordnet, morphy }
    }

    fn annotate_word(&self, surface: &str) -> Token {
        let token = Token::new(surface);
        if token.is_punctuation() {
            return token;
        }
        let exists = |pos, lemma: &str| self.wordnet.lemma_exists(pos, lemma);
        let mut best: Option<(Pos, String, u32)> = None;
        for pos in Pos::ALL {
            let Some(lemma) = self.morphy.base_form(pos, surface, exists) else {
                continue;
            };
            let weight = self
                .wordnet
                .index_entry(pos, &lemma)
                .map(|entry| entry.tagsense_cnt)
                .unwrap_or(0);
            if best.as_ref().is_none_or(|(_, _, w)| weight > *w) {
                best = Some((pos, lemma, weight));
            }
        }
        match best {
            Some((pos, lemma, _)) => token.with_lemma(lemma).with_pos(pos.into()),
            None => token,
        }
    }
}

impl Annotator for LexiconAnnotator {
    fn annotate(&self, raw: &str) -> Vec<Sentence> {
        split_sentences(tokenize(raw).into_iter().map(|w| self.annotate_word(w)))
    }
}

fn split_sentences(tokens: impl Iterator<Item = Token>) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut current = Vec::new();
    for token in tokens {
        let boundary = ends_sentence(token.surface());
        current.push(token);
        if boundary {
            sentences.push(Sentence::new(std::mem::take(&mut current)));
        }
    }
    if !current.is_empty() {
        sentences.push(Sentence::new(current));
    }
    sentences
}
