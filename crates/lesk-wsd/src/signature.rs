//! Per-sense signatures: the bag of words of each candidate gloss.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bag::{BagBuilder, BagOfWords};
use crate::inventory::SenseInventory;
use crate::text::PosTag;

/// The word being disambiguated.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub lemma: String,
    pub pos: PosTag,
}

impl Target {
    pub fn new(lemma: impl Into<String>, pos: PosTag) -> Self {
        Self {
            lemma: lemma.into(),
            pos,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Signature {
    pub sense_key: String,
    pub bag: BagOfWords,
    pub frequency: Option<u32>,
    pub gloss: String,
}

#[derive(Clone)]
pub struct SignatureGenerator {
    inventory: Arc<dyn SenseInventory>,
    bags: BagBuilder,
}

impl SignatureGenerator {
    pub fn new(inventory: Arc<dyn SenseInventory>, bags: BagBuilder) -> Self {
        Self { inventory, bags }
    }

    pub fn inventory(&self) -> &dyn SenseInventory {
        self.inventory.as_ref()
    }

    /// Signatures for every sense of `target`, in inventory order.
    ///
    /// Tags outside the four open classes and lemmas the inventory does not
    /// know both give an empty list.
    pub fn signatures(&self, target: &Target) -> Vec<Signature> {
        let Some(pos) = target.pos.wordnet_pos() else {
            debug!(
                "no senses for {} ({}): tag not in the sense inventory",
                target.lemma, target.pos
            );
            return Vec::new();
        };
        let candidates = self.inventory.lookup_senses(&target.lemma, pos);
        if candidates.is_empty() {
            debug!("no senses for {} ({})", target.lemma, target.pos);
        }
        candidates
            .into_iter()
            .map(|candidate| Signature {
                bag: self.bags.to_bag(&candidate.gloss),
                sense_key: candidate.sense_key,
                frequency: candidate.frequency,
                gloss: candidate.gloss,
            })
            .collect()
    }
}
