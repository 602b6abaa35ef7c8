//! WordNet morphology (morphy): inflected surface forms to dictionary lemmas.
//!
//! Lookup order for a surface form and POS:
//! 1. the surface form itself,
//! 2. irregular forms from the `*.exc` exception lists,
//! 3. suffix detachment rules, including the doubled-consonant case
//!    (`running` -> `run`),
//! 4. for nouns, `-ful` compounds (`boxesful` -> `boxful`) and collocations,
//!    where only the last word is inflected (`running_mates` -> `running_mate`).
//!
//! Every candidate is checked against a caller-supplied existence predicate,
//! so this crate never depends on a particular dictionary loader.
//!
//! ```no_run
//! use wordnet_db::WordNet;
//! use wordnet_morphy::Morphy;
//! use wordnet_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dict = "/usr/share/wordnet";
//! let wn = WordNet::load(dict)?;
//! let morph = Morphy::load(dict)?;
//! let exists = |pos, lemma: &str| wn.lemma_exists(pos, lemma);
//!
//! assert_eq!(morph.base_form(Pos::Noun, "banks", exists).as_deref(), Some("bank"));
//! assert_eq!(morph.base_form(Pos::Verb, "took", exists).as_deref(), Some("take"));
//! # Ok(()) }
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use wordnet_types::Pos;

/// One suffix detachment: strip `suffix`, append `replacement`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Detachment {
    pub suffix: &'static str,
    pub replacement: &'static str,
}

const fn rule(suffix: &'static str, replacement: &'static str) -> Detachment {
    Detachment {
        suffix,
        replacement,
    }
}

const NOUN_RULES: &[Detachment] = &[
    rule("s", ""),
    rule("ses", "s"),
    rule("xes", "x"),
    rule("zes", "z"),
    rule("ches", "ch"),
    rule("shes", "sh"),
    rule("men", "man"),
    rule("ies", "y"),
];

const VERB_RULES: &[Detachment] = &[
    rule("s", ""),
    rule("ies", "y"),
    rule("es", "e"),
    rule("es", ""),
    rule("ed", "e"),
    rule("ed", ""),
    rule("ing", "e"),
    rule("ing", ""),
];

const ADJ_RULES: &[Detachment] = &[
    rule("er", ""),
    rule("est", ""),
    rule("er", "e"),
    rule("est", "e"),
];

/// Detachment rules for `pos`, in the order they are tried.
pub fn rules_for(pos: Pos) -> &'static [Detachment] {
    match pos {
        Pos::Noun => NOUN_RULES,
        Pos::Verb => VERB_RULES,
        Pos::Adj => ADJ_RULES,
        Pos::Adv => &[],
    }
}

/// How a candidate lemma was found.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CandidateSource {
    Surface,
    Exception,
    Rule(Detachment),
    /// `-ful` noun compound or multi-word collocation rebuilt around an
    /// inflected part.
    Compound,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LemmaCandidate<'a> {
    pub pos: Pos,
    pub lemma: Cow<'a, str>,
    pub source: CandidateSource,
}

type ExceptionList = HashMap<String, Vec<String>>;

/// Morphy over the exception lists of one dictionary.
#[derive(Default)]
pub struct Morphy {
    exceptions: [ExceptionList; 4],
}

fn slot(pos: Pos) -> usize {
    match pos {
        Pos::Noun => 0,
        Pos::Verb => 1,
        Pos::Adj => 2,
        Pos::Adv => 3,
    }
}

fn exc_file(pos: Pos) -> &'static str {
    match pos {
        Pos::Noun => "noun.exc",
        Pos::Verb => "verb.exc",
        Pos::Adj => "adj.exc",
        Pos::Adv => "adv.exc",
    }
}

impl Morphy {
    /// Read `noun.exc`, `verb.exc`, `adj.exc` and `adv.exc` from a dict
    /// directory. Missing files count as empty lists.
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dict_dir.as_ref();
        let mut morphy = Self::default();
        for pos in Pos::ALL {
            let path = dir.join(exc_file(pos));
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(err) if err.kind() == ErrorKind::NotFound => continue,
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("read exception file {}", path.display()));
                }
            };
            morphy.exceptions[slot(pos)] = parse_exceptions(&text);
        }
        Ok(morphy)
    }

    /// No exception lists; only detachment rules apply.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register an irregular form by hand.
    pub fn add_exception(&mut self, pos: Pos, surface: &str, lemma: &str) {
        self.exceptions[slot(pos)]
            .entry(normalize(surface))
            .or_default()
            .push(normalize(lemma));
    }

    /// Irregular surface forms across all parts of speech.
    pub fn exception_count(&self) -> usize {
        self.exceptions.iter().map(HashMap::len).sum()
    }

    /// The first lemma [`lemmas_for`] would return.
    ///
    /// [`lemmas_for`]: Morphy::lemmas_for
    pub fn base_form<F>(&self, pos: Pos, surface: &str, lemma_exists: F) -> Option<String>
    where
        F: Fn(Pos, &str) -> bool,
    {
        self.lemmas_for(pos, surface, lemma_exists)
            .into_iter()
            .next()
            .map(|cand| cand.lemma.into_owned())
    }

    /// All known lemmas of `surface` under `pos`, deduplicated, in lookup
    /// order.
    pub fn lemmas_for<'a, F>(&'a self, pos: Pos, surface: &str, lemma_exists: F) -> Vec<LemmaCandidate<'a>>
    where
        F: Fn(Pos, &str) -> bool,
    {
        let word = normalize(surface);
        let mut found = Candidates::new(pos);
        if word.is_empty() {
            return found.into_vec();
        }

        if lemma_exists(pos, &word) {
            found.push(Cow::Owned(word.clone()), CandidateSource::Surface);
        }
        for lemma in self.exceptions_for(pos, &word) {
            if lemma_exists(pos, lemma) {
                found.push(Cow::Borrowed(lemma.as_str()), CandidateSource::Exception);
            }
        }
        for (lemma, detachment) in detach(pos, &word) {
            if lemma_exists(pos, &lemma) {
                found.push(Cow::Owned(lemma), CandidateSource::Rule(detachment));
            }
        }

        if pos == Pos::Noun {
            if let Some(head) = word.strip_suffix("ful").filter(|h| !h.is_empty()) {
                for lemma in self.simple_lemmas(pos, head) {
                    let compound = format!("{lemma}ful");
                    if lemma_exists(pos, &compound) {
                        found.push(Cow::Owned(compound), CandidateSource::Compound);
                    }
                }
            }
            if let Some((prefix, last)) = word.rsplit_once('_').filter(|(p, l)| !p.is_empty() && !l.is_empty()) {
                for lemma in self.simple_lemmas(pos, last) {
                    let collocation = format!("{prefix}_{lemma}");
                    if lemma_exists(pos, &collocation) {
                        found.push(Cow::Owned(collocation), CandidateSource::Compound);
                    }
                }
            }
        }

        found.into_vec()
    }

    fn exceptions_for(&self, pos: Pos, word: &str) -> &[String] {
        self.exceptions[slot(pos)]
            .get(word)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Unverified base forms of a single word: itself, its exceptions and
    /// every rule output.
    fn simple_lemmas(&self, pos: Pos, word: &str) -> Vec<String> {
        let mut out = vec![word.to_string()];
        out.extend(self.exceptions_for(pos, word).iter().cloned());
        out.extend(detach(pos, word).into_iter().map(|(lemma, _)| lemma));
        out
    }
}

struct Candidates<'a> {
    pos: Pos,
    out: Vec<LemmaCandidate<'a>>,
}

impl<'a> Candidates<'a> {
    fn new(pos: Pos) -> Self {
        Self {
            pos,
            out: Vec::new(),
        }
    }

    fn push(&mut self, lemma: Cow<'a, str>, source: CandidateSource) {
        if self.out.iter().any(|c| c.lemma == lemma) {
            return;
        }
        self.out.push(LemmaCandidate {
            pos: self.pos,
            lemma,
            source,
        });
    }

    fn into_vec(self) -> Vec<LemmaCandidate<'a>> {
        self.out
    }
}

/// Apply every detachment rule of `pos` to `word`.
fn detach(pos: Pos, word: &str) -> Vec<(String, Detachment)> {
    let mut out = Vec::new();
    for &detachment in rules_for(pos) {
        let Some(stem) = word.strip_suffix(detachment.suffix) else {
            continue;
        };
        if stem.is_empty() {
            continue;
        }
        out.push((format!("{stem}{}", detachment.replacement), detachment));
        if detachment.replacement.is_empty()
            && let Some(undoubled) = undouble(stem)
        {
            out.push((undoubled.to_string(), detachment));
        }
    }
    out
}

/// `runn` -> `run`: drop one of two identical trailing consonants.
fn undouble(stem: &str) -> Option<&str> {
    let mut chars = stem.chars().rev();
    let last = chars.next()?;
    let before = chars.next()?;
    if last == before && !matches!(last, 'a' | 'e' | 'i' | 'o' | 'u') {
        Some(&stem[..stem.len() - last.len_utf8()])
    } else {
        None
    }
}

/// `*.exc` lines: `surface lemma [lemma ...]`.
fn parse_exceptions(text: &str) -> ExceptionList {
    let mut map = ExceptionList::new();
    for line in text.lines() {
        let mut parts = line.split_whitespace();
        let Some(surface) = parts.next() else {
            continue;
        };
        let lemmas: Vec<String> = parts.map(normalize).collect();
        if !lemmas.is_empty() {
            map.entry(normalize(surface)).or_default().extend(lemmas);
        }
    }
    map
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn lexicon(entries: &[(&str, Pos)]) -> impl Fn(Pos, &str) -> bool {
        let known: HashSet<(Pos, String)> = entries
            .iter()
            .map(|(lemma, pos)| (*pos, lemma.to_string()))
            .collect();
        move |pos: Pos, lemma: &str| known.contains(&(pos, lemma.to_string()))
    }

    #[test]
    fn irregular_forms_come_from_exceptions() {
        let mut morph = Morphy::empty();
        morph.add_exception(Pos::Verb, "took", "take");
        let found = morph.lemmas_for(Pos::Verb, "Took", lexicon(&[("take", Pos::Verb)]));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].lemma, "take");
        assert_eq!(found[0].source, CandidateSource::Exception);
    }

    #[test]
    fn surface_comes_before_rules() {
        let morph = Morphy::empty();
        let found = morph.lemmas_for(
            Pos::Verb,
            "running",
            lexicon(&[("running", Pos::Verb), ("run", Pos::Verb)]),
        );
        let lemmas: Vec<&str> = found.iter().map(|c| c.lemma.as_ref()).collect();
        assert_eq!(lemmas, vec!["running", "run"]);
        assert_eq!(found[0].source, CandidateSource::Surface);
        assert_eq!(found[1].source, CandidateSource::Rule(rule("ing", "")));
    }

    #[test]
    fn plural_nouns_and_inflected_verbs() {
        let morph = Morphy::empty();
        let exists = lexicon(&[
            ("bank", Pos::Noun),
            ("deposit", Pos::Noun),
            ("church", Pos::Noun),
            ("accept", Pos::Verb),
            ("flow", Pos::Verb),
        ]);
        assert_eq!(morph.base_form(Pos::Noun, "banks", &exists).as_deref(), Some("bank"));
        assert_eq!(morph.base_form(Pos::Noun, "churches", &exists).as_deref(), Some("church"));
        assert_eq!(morph.base_form(Pos::Verb, "accepts", &exists).as_deref(), Some("accept"));
        assert_eq!(morph.base_form(Pos::Verb, "flowed", &exists).as_deref(), Some("flow"));
        assert_eq!(morph.base_form(Pos::Verb, "banks", &exists), None);
    }

    #[test]
    fn adverbs_have_no_rules() {
        let morph = Morphy::empty();
        let exists = lexicon(&[("fast", Pos::Adv)]);
        assert_eq!(morph.base_form(Pos::Adv, "faster", &exists), None);
        assert_eq!(morph.base_form(Pos::Adj, "faster", lexicon(&[("fast", Pos::Adj)])).as_deref(), Some("fast"));
    }

    #[test]
    fn noun_compounds_and_collocations() {
        let morph = Morphy::empty();
        let exists = lexicon(&[("boxful", Pos::Noun), ("running_mate", Pos::Noun)]);
        let boxful = morph.lemmas_for(Pos::Noun, "boxesful", &exists);
        assert_eq!(boxful[0].lemma, "boxful");
        assert_eq!(boxful[0].source, CandidateSource::Compound);
        assert_eq!(
            morph.base_form(Pos::Noun, "running mates", &exists).as_deref(),
            Some("running_mate")
        );
    }

    #[test]
    fn empty_input_has_no_lemmas() {
        let morph = Morphy::empty();
        assert!(morph.lemmas_for(Pos::Noun, "  ", |_, _| true).is_empty());
    }

    #[test]
    fn load_reads_exception_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("verb.exc"), "took take\nrisen rise\n\n").unwrap();
        std::fs::write(dir.path().join("noun.exc"), "geese goose\n").unwrap();
        let morph = Morphy::load(dir.path()).unwrap();
        assert_eq!(morph.exception_count(), 3);
        let exists = lexicon(&[("take", Pos::Verb), ("goose", Pos::Noun)]);
        assert_eq!(morph.base_form(Pos::Verb, "took", &exists).as_deref(), Some("take"));
        assert_eq!(morph.base_form(Pos::Noun, "geese", &exists).as_deref(), Some("goose"));
    }
}
