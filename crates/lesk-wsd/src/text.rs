//! Tokens, sentences and the tokenization convention shared by every text
//! that flows through disambiguation (corpus sentences, contexts, glosses).
//!
//! Text is split on whitespace, then leading and trailing punctuation is split
//! off each chunk, so `"scale,"` becomes `scale` `,` while inner punctuation
//! stays (`well-known`, `year's`). Corpora arrive already tokenized in Penn
//! Treebank style, so a standalone clitic (`'s`, `'re`) stays one token and so
//! does a run of one repeated mark (`...`, `--`, ``` `` ```, `''`).

use std::fmt;

use serde::{Deserialize, Serialize};
use wordnet_types::Pos;

/// Part-of-speech tag as it appears in corpora and annotator output.
///
/// Only the four open classes map onto the sense inventory; anything else is
/// kept verbatim in [`PosTag::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PosTag {
    Noun,
    Verb,
    Adj,
    Adv,
    Other(String),
}

impl PosTag {
    /// Case-insensitive parse; accepts the short (`ADJ`) and long
    /// (`ADJECTIVE`) spellings as well as WordNet's single letters.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "NOUN" | "N" => PosTag::Noun,
            "VERB" | "V" => PosTag::Verb,
            "ADJ" | "ADJECTIVE" | "A" | "S" => PosTag::Adj,
            "ADV" | "ADVERB" | "R" => PosTag::Adv,
            _ => PosTag::Other(raw.trim().to_string()),
        }
    }

    /// The sense-inventory POS, or `None` for tags WordNet does not cover.
    pub fn wordnet_pos(&self) -> Option<Pos> {
        match self {
            PosTag::Noun => Some(Pos::Noun),
            PosTag::Verb => Some(Pos::Verb),
            PosTag::Adj => Some(Pos::Adj),
            PosTag::Adv => Some(Pos::Adv),
            PosTag::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PosTag::Noun => "NOUN",
            PosTag::Verb => "VERB",
            PosTag::Adj => "ADJ",
            PosTag::Adv => "ADV",
            PosTag::Other(tag) => tag,
        }
    }
}

impl From<Pos> for PosTag {
    fn from(pos: Pos) -> Self {
        match pos {
            Pos::Noun => PosTag::Noun,
            Pos::Verb => PosTag::Verb,
            Pos::Adj => PosTag::Adj,
            Pos::Adv => PosTag::Adv,
        }
    }
}

impl From<String> for PosTag {
    fn from(raw: String) -> Self {
        PosTag::parse(&raw)
    }
}

impl From<PosTag> for String {
    fn from(tag: PosTag) -> Self {
        tag.as_str().to_string()
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A surface word with optional lemma and POS.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    surface: String,
    lemma: Option<String>,
    pos: Option<PosTag>,
}

impl Token {
    pub fn new(surface: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            lemma: None,
            pos: None,
        }
    }

    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = Some(lemma.into());
        self
    }

    pub fn with_pos(mut self, pos: PosTag) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn surface(&self) -> &str {
        &self.surface
    }

    pub fn lemma(&self) -> Option<&str> {
        self.lemma.as_deref()
    }

    pub fn pos(&self) -> Option<&PosTag> {
        self.pos.as_ref()
    }

    /// True when the token carries no letter or digit.
    pub fn is_punctuation(&self) -> bool {
        is_punctuation(&self.surface)
    }
}

/// An ordered, immutable run of tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sentence {
    tokens: Vec<Token>,
}

impl Sentence {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Join several sentences into one, keeping token order.
    pub fn concat(parts: impl IntoIterator<Item = Sentence>) -> Self {
        Self {
            tokens: parts.into_iter().flat_map(|s| s.tokens).collect(),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn get(&self, position: usize) -> Option<&Token> {
        self.tokens.get(position)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

pub fn is_punctuation(text: &str) -> bool {
    !text.chars().any(char::is_alphanumeric)
}

const CLITICS: [&str; 6] = ["'s", "'re", "'ll", "'ve", "'d", "'m"];

/// Split `text` into word and punctuation tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    for chunk in text.split_whitespace() {
        let Some(mut start) = chunk.find(char::is_alphanumeric) else {
            push_runs(&mut out, chunk);
            continue;
        };
        let end = chunk
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_alphanumeric())
            .map_or(chunk.len(), |(idx, c)| idx + c.len_utf8());
        if chunk[..start].ends_with('\'') && is_clitic(&chunk[start - 1..end]) {
            start -= 1;
        }
        push_runs(&mut out, &chunk[..start]);
        out.push(&chunk[start..end]);
        push_runs(&mut out, &chunk[end..]);
    }
    out
}

fn is_clitic(word: &str) -> bool {
    CLITICS.iter().any(|c| c.eq_ignore_ascii_case(word))
}

/// One token per run of the same character: `."` -> `.` `"`, `...` stays.
fn push_runs<'a>(out: &mut Vec<&'a str>, text: &'a str) {
    let mut rest = text;
    while let Some(first) = rest.chars().next() {
        let len = rest.find(|c| c != first).unwrap_or(rest.len());
        out.push(&rest[..len]);
        rest = &rest[len..];
    }
}

/// True for tokens that close a sentence.
pub fn ends_sentence(token: &str) -> bool {
    matches!(token, "." | "!" | "?")
}
