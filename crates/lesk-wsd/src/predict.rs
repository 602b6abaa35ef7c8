//! Scoring candidate senses against contexts.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::annotator::Annotator;
use crate::bag::BagBuilder;
use crate::config::PredictOptions;
use crate::context::extract_context;
use crate::corpus::{AmbiguousOccurrence, Corpus};
use crate::inventory::SenseInventory;
use crate::signature::{SignatureGenerator, Target};
use crate::stopwords::StopWords;
use crate::text::Sentence;

/// A sense key with its similarity score.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredSense {
    pub sense_key: String,
    pub score: f64,
}

/// Sense key to score for one ambiguous word; one entry per candidate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PredictionMap {
    scores: BTreeMap<String, f64>,
}

impl PredictionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sense_key: impl Into<String>, score: f64) {
        self.scores.insert(sense_key.into(), score);
    }

    pub fn get(&self, sense_key: &str) -> Option<f64> {
        self.scores.get(sense_key).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.scores.keys().map(String::as_str)
    }

    /// All senses, best first; equal scores are ordered by sense key.
    pub fn ranked(&self) -> Vec<ScoredSense> {
        let mut ranked: Vec<ScoredSense> = self
            .scores
            .iter()
            .map(|(key, &score)| ScoredSense {
                sense_key: key.clone(),
                score,
            })
            .collect();
        ranked.sort_by(rank_order);
        ranked
    }

    /// The best `k` senses (fewer when there are fewer candidates).
    pub fn top_k(&self, k: usize) -> Vec<ScoredSense> {
        let mut ranked = self.ranked();
        ranked.truncate(k);
        ranked
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for PredictionMap {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut map = PredictionMap::new();
        for (key, score) in iter {
            map.insert(key, score);
        }
        map
    }
}

/// Anything ranked best score first, equal scores by sense key.
trait Ranked {
    fn score(&self) -> f64;
    fn sense_key(&self) -> &str;
}

impl Ranked for ScoredSense {
    fn score(&self) -> f64 {
        self.score
    }

    fn sense_key(&self) -> &str {
        &self.sense_key
    }
}

impl Ranked for RankedSense {
    fn score(&self) -> f64 {
        self.score
    }

    fn sense_key(&self) -> &str {
        &self.sense_key
    }
}

fn rank_order<T: Ranked>(a: &T, b: &T) -> Ordering {
    b.score()
        .total_cmp(&a.score())
        .then_with(|| a.sense_key().cmp(b.sense_key()))
}

/// A ranked sense with what it was scored on.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedSense {
    pub sense_key: String,
    pub score: f64,
    pub frequency: Option<u32>,
    pub gloss: String,
}

/// Full answer for a single ambiguous word.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Disambiguation {
    pub lemma: String,
    pub pos: String,
    /// Distinct context words, sorted.
    pub context: Vec<String>,
    pub senses: Vec<RankedSense>,
}

/// Shared, read-only disambiguation resources.
pub struct Lesk {
    annotator: Arc<dyn Annotator>,
    bags: BagBuilder,
    signatures: SignatureGenerator,
}

impl Lesk {
    pub fn new(
        inventory: Arc<dyn SenseInventory>,
        annotator: Arc<dyn Annotator>,
        stopwords: Arc<StopWords>,
    ) -> Self {
        let bags = BagBuilder::new(Arc::clone(&annotator), stopwords);
        let signatures = SignatureGenerator::new(inventory, bags.clone());
        Self {
            annotator,
            bags,
            signatures,
        }
    }

    pub fn annotator(&self) -> &dyn Annotator {
        self.annotator.as_ref()
    }

    pub fn bags(&self) -> &BagBuilder {
        &self.bags
    }

    pub fn signatures(&self) -> &SignatureGenerator {
        &self.signatures
    }

    pub fn inventory(&self) -> &dyn SenseInventory {
        self.signatures.inventory()
    }

    /// Score every sense of `target` against the context of `position`.
    pub fn score(
        &self,
        sentence: &Sentence,
        position: usize,
        target: &Target,
        options: PredictOptions,
    ) -> PredictionMap {
        let signatures = self.signatures.signatures(target);
        if signatures.is_empty() {
            return PredictionMap::new();
        }
        let context = extract_context(&self.bags, sentence, position, options.policy);
        signatures
            .into_iter()
            .map(|sig| {
                let score = options.metric.score(&context, &sig.bag);
                (sig.sense_key, score)
            })
            .collect()
    }

    /// Ranked senses of `target` with gloss and frequency.
    pub fn disambiguate(
        &self,
        sentence: &Sentence,
        position: usize,
        target: &Target,
        options: PredictOptions,
    ) -> Disambiguation {
        let context = extract_context(&self.bags, sentence, position, options.policy);
        let mut senses: Vec<RankedSense> = self
            .signatures
            .signatures(target)
            .into_iter()
            .map(|sig| RankedSense {
                score: options.metric.score(&context, &sig.bag),
                sense_key: sig.sense_key,
                frequency: sig.frequency,
                gloss: sig.gloss,
            })
            .collect();
        senses.sort_by(rank_order);
        Disambiguation {
            lemma: target.lemma.clone(),
            pos: target.pos.to_string(),
            context: context.words().map(str::to_string).collect(),
            senses,
        }
    }

    fn predict_one(
        &self,
        corpus: &Corpus,
        occurrence: &AmbiguousOccurrence,
        options: PredictOptions,
    ) -> PredictionMap {
        let Some(sentence) = corpus.sentence(occurrence) else {
            warn!(
                "occurrence of {} refers to missing sentence {}",
                occurrence.target.lemma, occurrence.sentence
            );
            return PredictionMap::new();
        };
        let map = self.score(sentence, occurrence.position, &occurrence.target, options);
        debug!(
            "{} ({}) at {}:{} -> {} candidates",
            occurrence.target.lemma,
            occurrence.target.pos,
            occurrence.sentence,
            occurrence.position,
            map.len()
        );
        map
    }

    /// One prediction map per occurrence, in corpus order.
    pub fn predict(&self, corpus: &Corpus, options: PredictOptions) -> Vec<PredictionMap> {
        let start = Instant::now();
        let predictions: Vec<PredictionMap> = corpus
            .occurrences()
            .par_iter()
            .map(|occurrence| self.predict_one(corpus, occurrence, options))
            .collect();
        let unresolved = predictions.iter().filter(|p| p.is_empty()).count();
        info!(
            "scored {} ambiguous words ({} without senses) with {} / {} in {} ms",
            predictions.len(),
            unresolved,
            options.policy,
            options.metric,
            start.elapsed().as_millis()
        );
        predictions
    }
}
