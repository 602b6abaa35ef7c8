//! Bags of normalized content words built from glosses and contexts.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::annotator::Annotator;
use crate::stopwords::StopWords;
use crate::text::Token;

/// Multiset of normalized words. Iteration order is lexicographic so
/// anything derived from a bag is reproducible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BagOfWords {
    counts: BTreeMap<String, u32>,
}

impl BagOfWords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, word: impl Into<String>) {
        *self.counts.entry(word.into()).or_insert(0) += 1;
    }

    /// Term frequency of `word`, 0 when absent.
    pub fn count(&self, word: &str) -> u32 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.counts.contains_key(word)
    }

    /// Total number of words, duplicates included.
    pub fn len(&self) -> usize {
        self.counts.values().map(|&c| c as usize).sum()
    }

    /// Number of distinct words.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.counts.iter().map(|(w, &c)| (w.as_str(), c))
    }

    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.counts.keys().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for BagOfWords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut bag = BagOfWords::new();
        for word in iter {
            bag.insert(word);
        }
        bag
    }
}

/// Normalizes text into bags: annotate, lower-case, prefer the lemma, drop
/// punctuation and stopwords.
#[derive(Clone)]
pub struct BagBuilder {
    annotator: Arc<dyn Annotator>,
    stopwords: Arc<StopWords>,
}

impl BagBuilder {
    pub fn new(annotator: Arc<dyn Annotator>, stopwords: Arc<StopWords>) -> Self {
        Self {
            annotator,
            stopwords,
        }
    }

    pub fn annotator(&self) -> &dyn Annotator {
        self.annotator.as_ref()
    }

    pub fn stopwords(&self) -> &StopWords {
        &self.stopwords
    }

    /// Bag of a free text such as a gloss.
    pub fn to_bag(&self, text: &str) -> BagOfWords {
        let sentence = self.annotator.annotate_line(text);
        self.from_tokens(sentence.tokens())
    }

    /// Bag of already-annotated tokens; same normalization as [`to_bag`].
    ///
    /// [`to_bag`]: BagBuilder::to_bag
    pub fn from_tokens<'a>(&self, tokens: impl IntoIterator<Item = &'a Token>) -> BagOfWords {
        tokens
            .into_iter()
            .filter_map(|token| self.normalize(token))
            .collect()
    }

    /// The bag word for `token`, or `None` when it is punctuation or a
    /// stopword (by surface or by lemma).
    pub fn normalize(&self, token: &Token) -> Option<String> {
        if token.is_punctuation() || self.stopwords.contains(token.surface()) {
            return None;
        }
        let word = token.lemma().unwrap_or(token.surface()).to_lowercase();
        if word.is_empty() || self.stopwords.contains(&word) {
            return None;
        }
        Some(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotator::PlainAnnotator;
    use crate::text::PosTag;

    fn builder(stop: &[&str]) -> BagBuilder {
        BagBuilder::new(
            Arc::new(PlainAnnotator),
            Arc::new(StopWords::from_words(stop)),
        )
    }

    #[test]
    fn drops_stopwords_and_punctuation() {
        let bag = builder(&["a", "beside"]).to_bag("sloping land beside a river, water flow");
        let words: Vec<&str> = bag.words().collect();
        assert_eq!(words, vec!["flow", "land", "river", "sloping", "water"]);
    }

    #[test]
    fn lower_cases_and_counts() {
        let bag = builder(&[]).to_bag("Bank bank BANK river");
        assert_eq!(bag.count("bank"), 3);
        assert_eq!(bag.distinct(), 2);
        assert_eq!(bag.len(), 4);
    }

    #[test]
    fn all_stopwords_give_an_empty_bag() {
        let bag = builder(&["the", "of"]).to_bag("The of, the.");
        assert!(bag.is_empty());
        assert!(builder(&[]).to_bag("").is_empty());
    }

    #[test]
    fn prefers_lemma_over_surface() {
        let b = builder(&["was"]);
        let tokens = [
            Token::new("Banks").with_lemma("bank").with_pos(PosTag::Noun),
            Token::new("was").with_lemma("be"),
            Token::new("flooded"),
        ];
        let bag = b.from_tokens(&tokens);
        assert!(bag.contains("bank"));
        assert!(bag.contains("flooded"));
        assert!(!bag.contains("be"));
        assert_eq!(bag.distinct(), 2);
    }

    #[test]
    fn building_twice_is_identical() {
        let b = builder(&["a"]);
        let text = "a financial institution that accepts deposits";
        assert_eq!(b.to_bag(text), b.to_bag(text));
    }
}
