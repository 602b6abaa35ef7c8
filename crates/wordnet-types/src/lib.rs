//! Borrowed record types for WordNet dictionary files and sense keys.
//!
//! Strings borrow from whatever buffer the loader keeps; numbers keep the
//! width WordNet gives them. [`SenseKey`] parses and prints the
//! `lemma%ss_type:lex_filenum:lex_id:head_word:head_id` layout.
//!
//! ```rust
//! use wordnet_types::{Pos, SenseKey, SynsetType};
//!
//! let key = SenseKey::parse("bank%1:17:01::").unwrap();
//! assert_eq!(key.synset_type, SynsetType::Noun);
//! assert_eq!(key.synset_type.pos(), Pos::Noun);
//! assert_eq!(key.to_string(), "bank%1:17:01::");
//! ```

use std::fmt;

/// Part of speech of an index or data file.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Pos {
    Noun,
    Verb,
    Adj,
    Adv,
}

impl Pos {
    pub const ALL: [Pos; 4] = [Pos::Noun, Pos::Verb, Pos::Adj, Pos::Adv];

    /// `n`, `v`, `a` or `s` (satellites live with adjectives), `r`.
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'n' => Pos::Noun,
            'v' => Pos::Verb,
            'a' | 's' => Pos::Adj,
            'r' => Pos::Adv,
            _ => return None,
        })
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adj => "adj",
            Pos::Adv => "adv",
        };
        f.write_str(name)
    }
}

/// A synset is addressed by its byte offset in the `data.*` file of its POS.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SynsetId {
    pub pos: Pos,
    pub offset: u32,
}

/// The `ss_type` of a synset. Unlike [`Pos`] it tells satellites apart.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SynsetType {
    Noun,
    Verb,
    Adj,
    Adv,
    AdjSatellite,
}

const SYNSET_TYPES: [(SynsetType, char, u8); 5] = [
    (SynsetType::Noun, 'n', 1),
    (SynsetType::Verb, 'v', 2),
    (SynsetType::Adj, 'a', 3),
    (SynsetType::Adv, 'r', 4),
    (SynsetType::AdjSatellite, 's', 5),
];

impl SynsetType {
    pub fn from_char(c: char) -> Option<Self> {
        SYNSET_TYPES
            .iter()
            .find(|(_, ch, _)| *ch == c)
            .map(|(ty, _, _)| *ty)
    }

    pub fn from_digit(d: u8) -> Option<Self> {
        SYNSET_TYPES
            .iter()
            .find(|(_, _, digit)| *digit == d)
            .map(|(ty, _, _)| *ty)
    }

    /// The number used for this type inside sense keys.
    pub fn to_digit(self) -> u8 {
        SYNSET_TYPES
            .iter()
            .find(|(ty, _, _)| *ty == self)
            .map_or(0, |(_, _, digit)| *digit)
    }

    pub fn pos(self) -> Pos {
        match self {
            SynsetType::Noun => Pos::Noun,
            SynsetType::Verb => Pos::Verb,
            SynsetType::Adj | SynsetType::AdjSatellite => Pos::Adj,
            SynsetType::Adv => Pos::Adv,
        }
    }
}

/// A synset member word.
#[derive(Clone, Debug)]
pub struct Lemma<'a> {
    pub text: &'a str,
    pub lex_id: u8,
}

/// A semantic or lexical pointer. Word numbers are 1-based; `None` means
/// the pointer relates whole synsets.
#[derive(Clone, Debug)]
pub struct Pointer<'a> {
    pub symbol: &'a str,
    pub target: SynsetId,
    pub src_word: Option<u16>,
    pub dst_word: Option<u16>,
}

#[derive(Clone, Debug)]
pub struct Gloss<'a> {
    /// Everything after the `|`.
    pub raw: &'a str,
    pub definition: &'a str,
    /// Quoted usage examples.
    pub examples: Vec<&'a str>,
}

#[derive(Clone, Debug)]
pub struct Synset<'a> {
    pub id: SynsetId,
    pub lex_filenum: u8,
    pub synset_type: SynsetType,
    pub words: Vec<Lemma<'a>>,
    pub pointers: Vec<Pointer<'a>>,
    pub gloss: Gloss<'a>,
}

impl Synset<'_> {
    /// `lex_id` of a member word, ignoring case and adjective markers.
    pub fn lex_id_of(&self, lemma: &str) -> Option<u8> {
        self.words
            .iter()
            .find(|w| strip_adj_marker(w.text).eq_ignore_ascii_case(lemma))
            .map(|w| w.lex_id)
    }
}

/// One line of an `index.*` file.
#[derive(Clone, Debug)]
pub struct IndexEntry<'a> {
    pub lemma: &'a str,
    pub pos: Pos,
    pub synset_cnt: u32,
    pub p_cnt: u32,
    pub ptr_symbols: Vec<&'a str>,
    pub sense_cnt: u32,
    pub tagsense_cnt: u32,
    pub synset_offsets: &'a [u32],
}

/// One line of `index.sense`.
#[derive(Clone, Debug)]
pub struct SenseEntry<'a> {
    pub sense_key: &'a str,
    pub synset: SynsetId,
    pub sense_number: u32,
    pub tag_cnt: u32,
}

/// A sense key split into its parts, e.g. `lengthy%5:00:00:long:02`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SenseKey<'a> {
    pub lemma: &'a str,
    pub synset_type: SynsetType,
    pub lex_filenum: u8,
    pub lex_id: u8,
    /// Head adjective of a satellite.
    pub head_word: Option<&'a str>,
    pub head_id: Option<u8>,
}

impl<'a> SenseKey<'a> {
    /// `None` unless the key has a lemma and exactly five `:` fields with
    /// numeric type, file and id.
    pub fn parse(raw: &'a str) -> Option<Self> {
        let (lemma, lex_sense) = raw.split_once('%')?;
        let fields: Vec<&str> = lex_sense.split(':').collect();
        let [ss_type, lex_filenum, lex_id, head_word, head_id] = fields[..] else {
            return None;
        };
        if lemma.is_empty() {
            return None;
        }
        Some(Self {
            lemma,
            synset_type: SynsetType::from_digit(ss_type.parse().ok()?)?,
            lex_filenum: lex_filenum.parse().ok()?,
            lex_id: lex_id.parse().ok()?,
            head_word: Some(head_word).filter(|h| !h.is_empty()),
            head_id: match head_id {
                "" => None,
                id => Some(id.parse().ok()?),
            },
        })
    }
}

impl fmt::Display for SenseKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}%{}:{:02}:{:02}:{}:",
            self.lemma.to_ascii_lowercase(),
            self.synset_type.to_digit(),
            self.lex_filenum,
            self.lex_id,
            self.head_word.unwrap_or_default().to_ascii_lowercase(),
        )?;
        match self.head_id {
            Some(id) if self.head_word.is_some() => write!(f, "{id:02}"),
            _ => Ok(()),
        }
    }
}

/// `long(a)` -> `long`.
pub fn strip_adj_marker(word: &str) -> &str {
    match word.find('(') {
        Some(idx) if word.ends_with(')') => &word[..idx],
        _ => word,
    }
}

/// Split a pointer's four hex digits into source and target word numbers.
/// `00` in either half, or a malformed field, means "not specified".
pub fn decode_st(hex4: &str) -> (Option<u16>, Option<u16>) {
    let half = |digits: Option<&str>| {
        digits
            .and_then(|d| u16::from_str_radix(d, 16).ok())
            .filter(|n| *n != 0)
    };
    if hex4.len() != 4 || !hex4.is_ascii() {
        return (None, None);
    }
    (half(hex4.get(..2)), half(hex4.get(2..)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_word_numbers() {
        assert_eq!(decode_st("0000"), (None, None));
        assert_eq!(decode_st("0102"), (Some(1), Some(2)));
        assert_eq!(decode_st("0a00"), (Some(10), None));
        assert_eq!(decode_st("zz01"), (None, Some(1)));
        assert_eq!(decode_st("101"), (None, None));
    }

    #[test]
    fn synset_types_map_to_file_pos() {
        assert_eq!(SynsetType::from_char('s'), Some(SynsetType::AdjSatellite));
        assert_eq!(SynsetType::AdjSatellite.pos(), Pos::Adj);
        assert_eq!(SynsetType::from_digit(4), Some(SynsetType::Adv));
        assert_eq!(SynsetType::Verb.to_digit(), 2);
        assert_eq!(SynsetType::from_char('x'), None);
        assert_eq!(Pos::from_char('s'), Some(Pos::Adj));
    }

    #[test]
    fn sense_keys_parse_and_print() {
        let take = SenseKey::parse("take%2:38:09::").unwrap();
        assert_eq!(
            (take.lemma, take.synset_type, take.lex_filenum, take.lex_id),
            ("take", SynsetType::Verb, 38, 9)
        );
        assert_eq!((take.head_word, take.head_id), (None, None));
        assert_eq!(take.to_string(), "take%2:38:09::");

        let lengthy = SenseKey::parse("lengthy%5:00:00:long:02").unwrap();
        assert_eq!((lengthy.head_word, lengthy.head_id), (Some("long"), Some(2)));
        assert_eq!(lengthy.to_string(), "lengthy%5:00:00:long:02");
    }

    #[test]
    fn malformed_sense_keys() {
        for raw in [
            "take",
            "%2:38:09::",
            "take%6:38:09::",
            "take%2:xx:09::",
            "take%2:38:09:",
            "take%2:38:09:::",
        ] {
            assert!(SenseKey::parse(raw).is_none(), "{raw}");
        }
    }

    #[test]
    fn printed_keys_are_lowercase_and_padded() {
        let key = SenseKey {
            lemma: "River_Bank",
            synset_type: SynsetType::Noun,
            lex_filenum: 17,
            lex_id: 0,
            head_word: None,
            head_id: None,
        };
        assert_eq!(key.to_string(), "river_bank%1:17:00::");
    }

    #[test]
    fn adjective_markers() {
        assert_eq!(strip_adj_marker("galore(ip)"), "galore");
        assert_eq!(strip_adj_marker("bank"), "bank");
    }
}
