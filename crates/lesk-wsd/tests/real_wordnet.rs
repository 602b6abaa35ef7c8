//! Checks against an installed WordNet. Skipped unless `WORDNET_DIR` is set.

use std::path::PathBuf;
use std::sync::Arc;

use lesk_wsd::{
    Annotator, LexiconAnnotator, Lesk, PosTag, PredictOptions, SenseInventory, StopWords, Target,
    WordNetInventory,
};
use wordnet_db::{LoadMode, WordNet};
use wordnet_morphy::Morphy;
use wordnet_types::{Pos, SenseKey};

fn dict_dir() -> Option<PathBuf> {
    std::env::var_os("WORDNET_DIR").map(PathBuf::from)
}

fn stopwords() -> StopWords {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/stopwords.txt");
    StopWords::load(path).unwrap()
}

#[test]
fn bank_senses_have_well_formed_keys() {
    let Some(dir) = dict_dir() else {
        eprintln!("WORDNET_DIR not set; skipping");
        return;
    };
    let wordnet = Arc::new(WordNet::load_with_mode(&dir, LoadMode::Mmap).unwrap());
    let inventory = WordNetInventory::new(Arc::clone(&wordnet));

    let senses = inventory.lookup_senses("bank", Pos::Noun);
    assert!(senses.len() >= 2);
    for sense in &senses {
        let key = SenseKey::parse(&sense.sense_key).unwrap();
        assert_eq!(key.lemma, "bank");
        assert!(!sense.gloss.is_empty());
    }
    assert!(senses.iter().any(|s| s.frequency.is_some()));
}

#[test]
fn river_bank_is_not_the_financial_sense() {
    let Some(dir) = dict_dir() else {
        eprintln!("WORDNET_DIR not set; skipping");
        return;
    };
    let wordnet = Arc::new(WordNet::load(&dir).unwrap());
    let morphy = Arc::new(Morphy::load(&dir).unwrap());
    let annotator = Arc::new(LexiconAnnotator::new(Arc::clone(&wordnet), morphy));
    let lesk = Lesk::new(
        Arc::new(WordNetInventory::new(wordnet)),
        annotator.clone(),
        Arc::new(stopwords()),
    );

    let sentence = annotator
        .annotate_line("The river overflowed its bank and the water flooded the sloping land.");
    assert_eq!(sentence.get(4).and_then(|t| t.lemma()), Some("bank"));

    let result = lesk.disambiguate(
        &sentence,
        4,
        &Target::new("bank", PosTag::Noun),
        PredictOptions::default(),
    );
    assert!(!result.senses.is_empty());
    assert!(result.senses[0].score > 0.0);
    assert_ne!(result.senses[0].sense_key, "bank%1:14:00::");
}
