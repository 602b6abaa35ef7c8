//! Sense inventories: where candidate senses and their glosses come from.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use wordnet_db::WordNet;
use wordnet_types::Pos;

/// One candidate sense of a (lemma, POS) pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SenseCandidate {
    pub sense_key: String,
    pub gloss: String,
    /// Tagged-corpus frequency, when the inventory records one.
    pub frequency: Option<u32>,
}

impl SenseCandidate {
    pub fn new(sense_key: impl Into<String>, gloss: impl Into<String>) -> Self {
        Self {
            sense_key: sense_key.into(),
            gloss: gloss.into(),
            frequency: None,
        }
    }

    pub fn with_frequency(mut self, frequency: u32) -> Self {
        self.frequency = Some(frequency);
        self
    }
}

/// Lookup of senses by lemma and POS. Unknown lemmas give an empty list.
pub trait SenseInventory: Send + Sync {
    fn lookup_senses(&self, lemma: &str, pos: Pos) -> Vec<SenseCandidate>;
}

/// Which part of a WordNet gloss becomes the signature text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GlossSource {
    /// Definition plus quoted examples.
    #[default]
    Full,
    /// Definition only.
    Definition,
}

pub struct WordNetInventory {
    wordnet: Arc<WordNet>,
    gloss: GlossSource,
}

impl WordNetInventory {
    pub fn new(wordnet: Arc<WordNet>) -> Self {
        Self {
            wordnet,
            gloss: GlossSource::default(),
        }
    }

    pub fn with_gloss_source(mut self, gloss: GlossSource) -> Self {
        self.gloss = gloss;
        self
    }

    pub fn wordnet(&self) -> &WordNet {
        &self.wordnet
    }
}

impl SenseInventory for WordNetInventory {
    fn lookup_senses(&self, lemma: &str, pos: Pos) -> Vec<SenseCandidate> {
        self.wordnet
            .senses(pos, lemma)
            .into_iter()
            .map(|sense| {
                let gloss = match self.gloss {
                    GlossSource::Full => sense.synset.gloss.raw,
                    GlossSource::Definition => sense.synset.gloss.definition,
                };
                SenseCandidate {
                    sense_key: sense.sense_key.into_owned(),
                    gloss: gloss.trim().to_string(),
                    frequency: sense.tag_cnt,
                }
            })
            .collect()
    }
}

/// Inventory held in memory, keyed by lower-cased lemma and POS.
#[derive(Clone, Debug, Default)]
pub struct MemoryInventory {
    senses: HashMap<(Pos, String), Vec<SenseCandidate>>,
}

impl MemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sense; lookup order is insertion order.
    pub fn insert(&mut self, lemma: &str, pos: Pos, candidate: SenseCandidate) {
        self.senses
            .entry((pos, lemma.to_lowercase()))
            .or_default()
            .push(candidate);
    }

    pub fn with_sense(mut self, lemma: &str, pos: Pos, candidate: SenseCandidate) -> Self {
        self.insert(lemma, pos, candidate);
        self
    }
}

impl SenseInventory for MemoryInventory {
    fn lookup_senses(&self, lemma: &str, pos: Pos) -> Vec<SenseCandidate> {
        self.senses
            .get(&(pos, lemma.to_lowercase()))
            .cloned()
            .unwrap_or_default()
    }
}
