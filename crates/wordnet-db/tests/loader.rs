use std::path::{Path, PathBuf};

use wordnet_db::{LoadMode, WordNet};
use wordnet_types::{Pos, SynsetId, SynsetType};

fn dict() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/wn")
}

fn load(mode: LoadMode) -> WordNet {
    WordNet::load_with_mode(dict(), mode).unwrap()
}

fn id(pos: Pos, offset: u32) -> SynsetId {
    SynsetId { pos, offset }
}

#[test]
fn both_load_modes_see_the_same_dictionary() {
    let mapped = load(LoadMode::Mmap);
    let owned = load(LoadMode::Owned);
    for wn in [&mapped, &owned] {
        assert_eq!(wn.synset_count(), 6);
        assert_eq!(wn.sense_index_count(), 1);
        assert_eq!(wn.tag_count_entries(), 1);
    }
    assert_eq!((mapped.index_count(), owned.index_count()), (7, 7));
}

#[test]
fn index_lines_keep_every_field() {
    let wn = load(LoadMode::Mmap);
    let dog = wn.index_entry(Pos::Noun, "DOG").unwrap();
    assert_eq!(
        (dog.lemma, dog.synset_cnt, dog.p_cnt, dog.sense_cnt, dog.tagsense_cnt),
        ("dog", 1, 1, 1, 1)
    );
    assert_eq!(dog.ptr_symbols, ["@"]);
    assert_eq!(dog.synset_offsets, [1740]);
    assert_eq!(wn.synsets_for_lemma(Pos::Noun, "dog"), [id(Pos::Noun, 1740)]);
}

#[test]
fn data_lines_yield_words_pointers_and_gloss() {
    let wn = load(LoadMode::Mmap);
    let dog = wn.get_synset(id(Pos::Noun, 1740)).unwrap();
    assert_eq!((dog.lex_filenum, dog.synset_type), (3, SynsetType::Noun));

    let words: Vec<(&str, u8)> = dog.words.iter().map(|w| (w.text, w.lex_id)).collect();
    assert_eq!(words, [("dog", 0), ("domestic_dog", 1)]);

    let hypernym = &dog.pointers[..];
    assert_eq!(hypernym.len(), 1);
    assert_eq!(hypernym[0].symbol, "@");
    assert_eq!(hypernym[0].target, id(Pos::Noun, 2140));
    assert_eq!((hypernym[0].src_word, hypernym[0].dst_word), (Some(1), Some(1)));

    assert_eq!(dog.gloss.raw, r#"domestic animal kept as a pet; "a pet dog""#);
    assert_eq!(dog.gloss.definition, "domestic animal kept as a pet");
    assert_eq!(dog.gloss.examples, ["a pet dog"]);
}

#[test]
fn verb_frames_do_not_leak_into_the_gloss() {
    let wn = load(LoadMode::Owned);
    let run = wn.get_synset(id(Pos::Verb, 2500)).unwrap();
    assert_eq!(run.words[0].text, "run");
    assert!(run.pointers.is_empty());
    assert_eq!(run.gloss.definition, "move fast by using one's feet");
    assert_eq!(run.gloss.examples, ["run to the store"]);
}

#[test]
fn index_sense_supplies_keys_and_counts() {
    let wn = load(LoadMode::Mmap);
    let senses = wn.senses(Pos::Noun, "dog");
    assert_eq!(senses.len(), 1);
    assert_eq!(senses[0].sense_key, "dog%1:03:00::");
    assert_eq!((senses[0].sense_number, senses[0].tag_cnt), (1, Some(12)));

    let entry = wn.sense_entry(Pos::Noun, "dog", id(Pos::Noun, 1740)).unwrap();
    assert_eq!(entry.sense_key, "dog%1:03:00::");
    assert_eq!(entry.tag_cnt, 12);
}

#[test]
fn missing_keys_are_built_from_the_synset() {
    let wn = load(LoadMode::Owned);

    let domestic = wn.senses(Pos::Noun, "Domestic Dog");
    assert_eq!(domestic[0].sense_key, "domestic_dog%1:03:01::");
    assert_eq!(domestic[0].tag_cnt, None);
    assert!(wn.sense_entry(Pos::Noun, "domestic_dog", id(Pos::Noun, 1740)).is_none());

    // cntlist.rev still supplies the count when index.sense has no line.
    let run = wn.senses(Pos::Verb, "run");
    assert_eq!(run[0].sense_key, "run%2:38:00::");
    assert_eq!(run[0].tag_cnt, Some(42));

    assert_eq!(wn.senses(Pos::Adj, "long")[0].sense_key, "long%3:00:02::");
    assert_eq!(
        wn.sense_key(Pos::Adj, "lengthy", id(Pos::Adj, 1100)).as_deref(),
        Some("lengthy%5:00:00:long:02")
    );
}

#[test]
fn absent_lemmas_are_empty_not_errors() {
    let wn = load(LoadMode::Mmap);
    assert!(wn.senses(Pos::Noun, "xylophone").is_empty());
    assert!(wn.senses(Pos::Verb, "dog").is_empty());
    assert!(wn.synsets_for_lemma(Pos::Adv, "dog").is_empty());
    assert!(!wn.lemma_exists(Pos::Adv, "dog"));
    assert!(wn.sense_key(Pos::Noun, "animal", id(Pos::Noun, 1740)).is_none());
}

#[test]
fn load_fails_without_the_core_files() {
    let dir = tempfile::tempdir().unwrap();
    let err = WordNet::load(dir.path()).err().unwrap();
    assert!(err.to_string().contains("missing required WordNet file"));
}

#[test]
fn load_reports_the_offending_line() {
    let dir = tempfile::tempdir().unwrap();
    for entry in std::fs::read_dir(dict()).unwrap() {
        let path = entry.unwrap().path();
        std::fs::copy(&path, dir.path().join(path.file_name().unwrap())).unwrap();
    }
    std::fs::write(dir.path().join("index.sense"), "dog%1:03:00:: 00001740 1\n").unwrap();
    let err = WordNet::load(dir.path()).err().unwrap();
    assert_eq!(err.to_string(), "index.sense:1: missing tag_cnt");
}
