//! WordNet dictionary loader with sense keys and tagged-sense counts.
//!
//! Reads the `data.*` and `index.*` files (required) plus `index.sense` and
//! `cntlist.rev` (optional) from a dict directory. Files are memory-mapped or
//! read into owned buffers ([`LoadMode`]); every string handed out borrows
//! from those buffers.
//!
//! Sense keys come from `index.sense` when the dictionary ships it and are
//! otherwise rebuilt from the synset record, following the `&` pointer of
//! adjective satellites to find the head word. Tag counts come from
//! `index.sense`, falling back to `cntlist.rev`.
//!
//! ```no_run
//! use wordnet_db::WordNet;
//! use wordnet_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let wn = WordNet::load("/usr/share/wordnet")?;
//! for sense in wn.senses(Pos::Noun, "bank") {
//!     println!("{} {:?} {}", sense.sense_key, sense.tag_cnt, sense.synset.gloss.definition);
//! }
//! # Ok(()) }
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::path::Path;
use std::str::{FromStr, SplitAsciiWhitespace};

use anyhow::{Context, Result, anyhow, bail};
use memmap2::Mmap;
use wordnet_types::{
    Gloss, IndexEntry, Lemma, Pointer, Pos, SenseEntry, SenseKey, Synset, SynsetId, SynsetType,
    decode_st, strip_adj_marker,
};

/// How dictionary files are brought into memory.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map each file.
    Mmap,
    /// Read each file into a `Vec<u8>`.
    Owned,
}

enum Buffer {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn open(path: &Path, mode: LoadMode) -> Result<Self> {
        match mode {
            LoadMode::Mmap => {
                let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
                // SAFETY: dictionary files are treated as read-only for the
                // lifetime of the map.
                let map = unsafe { Mmap::map(&file) }
                    .with_context(|| format!("mmap {}", path.display()))?;
                Ok(Buffer::Mapped(map))
            }
            LoadMode::Owned => fs::read(path)
                .map(Buffer::Owned)
                .with_context(|| format!("read {}", path.display())),
        }
    }

    fn bytes(&self) -> &[u8] {
        match self {
            Buffer::Mapped(map) => map,
            Buffer::Owned(bytes) => bytes,
        }
    }
}

/// The dictionary files this crate reads.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Source {
    DataNoun,
    DataVerb,
    DataAdj,
    DataAdv,
    IndexNoun,
    IndexVerb,
    IndexAdj,
    IndexAdv,
    IndexSense,
    Cntlist,
}

const SOURCES: [Source; 10] = [
    Source::DataNoun,
    Source::DataVerb,
    Source::DataAdj,
    Source::DataAdv,
    Source::IndexNoun,
    Source::IndexVerb,
    Source::IndexAdj,
    Source::IndexAdv,
    Source::IndexSense,
    Source::Cntlist,
];

impl Source {
    fn file_name(self) -> &'static str {
        match self {
            Source::DataNoun => "data.noun",
            Source::DataVerb => "data.verb",
            Source::DataAdj => "data.adj",
            Source::DataAdv => "data.adv",
            Source::IndexNoun => "index.noun",
            Source::IndexVerb => "index.verb",
            Source::IndexAdj => "index.adj",
            Source::IndexAdv => "index.adv",
            Source::IndexSense => "index.sense",
            Source::Cntlist => "cntlist.rev",
        }
    }

    fn required(self) -> bool {
        !matches!(self, Source::IndexSense | Source::Cntlist)
    }

    fn data(pos: Pos) -> Self {
        match pos {
            Pos::Noun => Source::DataNoun,
            Pos::Verb => Source::DataVerb,
            Pos::Adj => Source::DataAdj,
            Pos::Adv => Source::DataAdv,
        }
    }

    fn index(pos: Pos) -> Self {
        match pos {
            Pos::Noun => Source::IndexNoun,
            Pos::Verb => Source::IndexVerb,
            Pos::Adj => Source::IndexAdj,
            Pos::Adv => Source::IndexAdv,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// One buffer slot per [`Source`], in `SOURCES` order.
struct Files {
    buffers: Vec<Option<Buffer>>,
}

impl Files {
    fn open(dir: &Path, mode: LoadMode) -> Result<Self> {
        let mut buffers = Vec::with_capacity(SOURCES.len());
        for source in SOURCES {
            let path = dir.join(source.file_name());
            if !path.exists() {
                if source.required() {
                    bail!("missing required WordNet file: {}", path.display());
                }
                buffers.push(None);
                continue;
            }
            buffers.push(Some(Buffer::open(&path, mode)?));
        }
        Ok(Self { buffers })
    }

    fn bytes(&self, source: Source) -> &[u8] {
        self.buffers[source as usize]
            .as_ref()
            .map(Buffer::bytes)
            .unwrap_or(&[])
    }

    fn text(&self, span: Span) -> &str {
        let bytes = self.bytes(span.source);
        // Spans are cut from lines that were validated as UTF-8 while parsing.
        std::str::from_utf8(&bytes[span.start..span.start + span.len]).unwrap_or_default()
    }
}

/// Location of a string inside one of the dictionary buffers.
#[derive(Clone, Copy, Debug)]
struct Span {
    source: Source,
    start: usize,
    len: usize,
}

impl Span {
    /// `text` must be a subslice of `buffer`.
    fn of(source: Source, buffer: &[u8], text: &str) -> Self {
        Span {
            source,
            start: text.as_ptr() as usize - buffer.as_ptr() as usize,
            len: text.len(),
        }
    }
}

struct IndexRecord {
    lemma: Span,
    synset_cnt: u32,
    p_cnt: u32,
    ptr_symbols: Vec<Span>,
    sense_cnt: u32,
    tagsense_cnt: u32,
    offsets: Vec<u32>,
    synsets: Vec<SynsetId>,
}

struct PointerRecord {
    symbol: Span,
    target: SynsetId,
    src_word: Option<u16>,
    dst_word: Option<u16>,
}

struct SynsetRecord {
    id: SynsetId,
    lex_filenum: u8,
    synset_type: SynsetType,
    words: Vec<(Span, u8)>,
    pointers: Vec<PointerRecord>,
    gloss: Span,
    definition: Span,
    examples: Vec<Span>,
}

#[derive(Debug)]
struct SenseRecord {
    key: Span,
    sense_number: u32,
    tag_cnt: u32,
}

type SenseIndex = HashMap<(Pos, String, u32), SenseRecord>;

/// One sense of a lemma: its synset, sense key and frequency.
#[derive(Clone, Debug)]
pub struct Sense<'a> {
    pub sense_key: Cow<'a, str>,
    pub sense_number: u32,
    /// Semantic-concordance tag count; `None` when neither `index.sense`
    /// nor `cntlist.rev` records one.
    pub tag_cnt: Option<u32>,
    pub synset: Synset<'a>,
}

/// A loaded WordNet dictionary.
pub struct WordNet {
    files: Files,
    index: HashMap<(Pos, String), IndexRecord>,
    synsets: HashMap<SynsetId, SynsetRecord>,
    sense_index: SenseIndex,
    tag_counts: HashMap<String, u32>,
}

impl WordNet {
    /// Load with memory-mapped files.
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_mode(dict_dir, LoadMode::Mmap)
    }

    pub fn load_with_mode(dict_dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let files = Files::open(dict_dir.as_ref(), mode)?;

        let mut index = HashMap::new();
        let mut synsets = HashMap::new();
        for pos in Pos::ALL {
            read_index(&files, pos, &mut index)?;
            read_data(&files, pos, &mut synsets)?;
        }
        let sense_index = read_index_sense(files.bytes(Source::IndexSense))?;
        let tag_counts = read_cntlist(files.bytes(Source::Cntlist));

        Ok(Self {
            files,
            index,
            synsets,
            sense_index,
            tag_counts,
        })
    }

    pub fn lemma_exists(&self, pos: Pos, lemma: &str) -> bool {
        self.index.contains_key(&(pos, normalize_lemma(lemma)))
    }

    pub fn index_entry(&self, pos: Pos, lemma: &str) -> Option<IndexEntry<'_>> {
        let record = self.index.get(&(pos, normalize_lemma(lemma)))?;
        Some(IndexEntry {
            lemma: self.files.text(record.lemma),
            pos,
            synset_cnt: record.synset_cnt,
            p_cnt: record.p_cnt,
            ptr_symbols: record
                .ptr_symbols
                .iter()
                .map(|span| self.files.text(*span))
                .collect(),
            sense_cnt: record.sense_cnt,
            tagsense_cnt: record.tagsense_cnt,
            synset_offsets: &record.offsets,
        })
    }

    /// Synsets of a lemma in index (sense number) order.
    pub fn synsets_for_lemma(&self, pos: Pos, lemma: &str) -> &[SynsetId] {
        self.index
            .get(&(pos, normalize_lemma(lemma)))
            .map(|record| record.synsets.as_slice())
            .unwrap_or(&[])
    }

    pub fn get_synset(&self, id: SynsetId) -> Option<Synset<'_>> {
        self.synsets.get(&id).map(|record| self.view(record))
    }

    pub fn iter_synsets(&self) -> impl Iterator<Item = Synset<'_>> + '_ {
        self.synsets.values().map(|record| self.view(record))
    }

    /// Every sense of `lemma`, in index order. Index offsets with no
    /// matching `data.*` record are skipped.
    pub fn senses(&self, pos: Pos, lemma: &str) -> Vec<Sense<'_>> {
        let lemma = normalize_lemma(lemma);
        let mut senses = Vec::new();
        for (rank, id) in self.synsets_for_lemma(pos, &lemma).iter().enumerate() {
            let Some(synset) = self.get_synset(*id) else {
                continue;
            };
            let recorded = self.sense_index.get(&(pos, lemma.clone(), id.offset));
            let (sense_key, sense_number, tag_cnt) = match recorded {
                Some(record) => (
                    Cow::Borrowed(self.files.text(record.key)),
                    record.sense_number,
                    Some(record.tag_cnt),
                ),
                None => {
                    let Some(key) = self.build_sense_key(&lemma, &synset) else {
                        continue;
                    };
                    let tag_cnt = self.tag_counts.get(&key).copied();
                    (Cow::Owned(key), rank as u32 + 1, tag_cnt)
                }
            };
            senses.push(Sense {
                sense_key,
                sense_number,
                tag_cnt,
                synset,
            });
        }
        senses
    }

    /// Sense key of `lemma` in `synset`, when the lemma is a member.
    pub fn sense_key(&self, pos: Pos, lemma: &str, synset: SynsetId) -> Option<Cow<'_, str>> {
        let lemma = normalize_lemma(lemma);
        if let Some(record) = self.sense_index.get(&(pos, lemma.clone(), synset.offset)) {
            return Some(Cow::Borrowed(self.files.text(record.key)));
        }
        let synset = self.get_synset(synset)?;
        self.build_sense_key(&lemma, &synset).map(Cow::Owned)
    }

    /// The `index.sense` line for a lemma in a synset, if shipped.
    pub fn sense_entry(&self, pos: Pos, lemma: &str, synset: SynsetId) -> Option<SenseEntry<'_>> {
        let record = self
            .sense_index
            .get(&(pos, normalize_lemma(lemma), synset.offset))?;
        Some(SenseEntry {
            sense_key: self.files.text(record.key),
            synset,
            sense_number: record.sense_number,
            tag_cnt: record.tag_cnt,
        })
    }

    pub fn index_count(&self) -> usize {
        self.index.len()
    }

    /// Distinct (POS, lemma) pairs with at least one synset.
    pub fn lemma_count(&self) -> usize {
        self.index
            .values()
            .filter(|record| !record.synsets.is_empty())
            .count()
    }

    pub fn synset_count(&self) -> usize {
        self.synsets.len()
    }

    pub fn sense_index_count(&self) -> usize {
        self.sense_index.len()
    }

    pub fn tag_count_entries(&self) -> usize {
        self.tag_counts.len()
    }

    /// `lemma%ss_type:lex_filenum:lex_id:head_word:head_id`
    fn build_sense_key(&self, lemma: &str, synset: &Synset<'_>) -> Option<String> {
        let lex_id = synset.lex_id_of(lemma)?;
        let head = match synset.synset_type {
            SynsetType::AdjSatellite => self.satellite_head(synset),
            _ => None,
        };
        let key = SenseKey {
            lemma,
            synset_type: synset.synset_type,
            lex_filenum: synset.lex_filenum,
            lex_id,
            head_word: head.map(|(word, _)| word),
            head_id: head.map(|(_, id)| id),
        };
        Some(key.to_string())
    }

    /// First word and lex id of the head synset a satellite points to.
    fn satellite_head(&self, synset: &Synset<'_>) -> Option<(&str, u8)> {
        let target = synset.pointers.iter().find(|p| p.symbol == "&")?.target;
        let (span, lex_id) = *self.synsets.get(&target)?.words.first()?;
        Some((strip_adj_marker(self.files.text(span)), lex_id))
    }

    fn view<'a>(&'a self, record: &'a SynsetRecord) -> Synset<'a> {
        let text = |span: Span| self.files.text(span);
        Synset {
            id: record.id,
            lex_filenum: record.lex_filenum,
            synset_type: record.synset_type,
            words: record
                .words
                .iter()
                .map(|&(span, lex_id)| Lemma {
                    text: text(span),
                    lex_id,
                })
                .collect(),
            pointers: record
                .pointers
                .iter()
                .map(|p| Pointer {
                    symbol: text(p.symbol),
                    target: p.target,
                    src_word: p.src_word,
                    dst_word: p.dst_word,
                })
                .collect(),
            gloss: Gloss {
                raw: text(record.gloss),
                definition: text(record.definition),
                examples: record.examples.iter().map(|span| text(*span)).collect(),
            },
        }
    }
}

/// Non-empty lines with their 1-based numbers, skipping the license header
/// (lines that start with whitespace).
fn records(source: Source, bytes: &[u8]) -> impl Iterator<Item = Result<(usize, &str)>> + '_ {
    bytes
        .split(|b| *b == b'\n')
        .enumerate()
        .filter_map(move |(idx, raw)| {
            let line = raw.strip_suffix(b"\r").unwrap_or(raw);
            if line.is_empty() || matches!(line[0], b' ' | b'\t') {
                return None;
            }
            Some(
                std::str::from_utf8(line)
                    .map(|text| (idx + 1, text))
                    .with_context(|| format!("{source}:{}: invalid UTF-8", idx + 1)),
            )
        })
}

/// Whitespace-separated fields of one line, with errors located by file
/// and line.
struct Fields<'a> {
    source: Source,
    line: usize,
    iter: SplitAsciiWhitespace<'a>,
}

impl<'a> Fields<'a> {
    fn new(source: Source, line: usize, text: &'a str) -> Self {
        Self {
            source,
            line,
            iter: text.split_ascii_whitespace(),
        }
    }

    fn token(&mut self, what: &str) -> Result<&'a str> {
        self.iter
            .next()
            .ok_or_else(|| anyhow!("{}:{}: missing {what}", self.source, self.line))
    }

    fn number<T>(&mut self, what: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let token = self.token(what)?;
        token
            .parse()
            .with_context(|| format!("{}:{}: bad {what} `{token}`", self.source, self.line))
    }

    fn hex(&mut self, what: &str) -> Result<u32> {
        let token = self.token(what)?;
        u32::from_str_radix(token, 16)
            .with_context(|| format!("{}:{}: bad {what} `{token}`", self.source, self.line))
    }

    fn error(&self, message: impl fmt::Display) -> anyhow::Error {
        anyhow!("{}:{}: {message}", self.source, self.line)
    }
}

/// `lemma pos synset_cnt p_cnt [ptr_symbol...] sense_cnt tagsense_cnt synset_offset...`
fn read_index(
    files: &Files,
    pos: Pos,
    index: &mut HashMap<(Pos, String), IndexRecord>,
) -> Result<()> {
    let source = Source::index(pos);
    let bytes = files.bytes(source);
    for record in records(source, bytes) {
        let (line, text) = record?;
        let mut fields = Fields::new(source, line, text);
        let lemma = fields.token("lemma")?;
        fields.token("pos")?;
        let synset_cnt: u32 = fields.number("synset_cnt")?;
        let p_cnt: u32 = fields.number("p_cnt")?;
        let ptr_symbols = (0..p_cnt)
            .map(|_| fields.token("pointer symbol").map(|sym| Span::of(source, bytes, sym)))
            .collect::<Result<Vec<_>>>()?;
        let sense_cnt: u32 = fields.number("sense_cnt")?;
        let tagsense_cnt: u32 = fields.number("tagsense_cnt")?;
        let offsets = (0..synset_cnt)
            .map(|_| fields.number::<u32>("synset_offset"))
            .collect::<Result<Vec<_>>>()?;

        index.insert(
            (pos, normalize_lemma(lemma)),
            IndexRecord {
                lemma: Span::of(source, bytes, lemma),
                synset_cnt,
                p_cnt,
                ptr_symbols,
                sense_cnt,
                tagsense_cnt,
                synsets: offsets.iter().map(|&offset| SynsetId { pos, offset }).collect(),
                offsets,
            },
        );
    }
    Ok(())
}

/// `offset lex_filenum ss_type w_cnt [word lex_id]... p_cnt [ptr]... [frames] | gloss`
fn read_data(files: &Files, pos: Pos, synsets: &mut HashMap<SynsetId, SynsetRecord>) -> Result<()> {
    let source = Source::data(pos);
    let bytes = files.bytes(source);
    for record in records(source, bytes) {
        let (line, text) = record?;
        let (head, gloss) = text.split_once('|').unwrap_or((text, &text[text.len()..]));
        let mut fields = Fields::new(source, line, head);

        let offset: u32 = fields.number("offset")?;
        let lex_filenum: u8 = fields.number("lex_filenum")?;
        let ss_type = fields.token("ss_type")?;
        let synset_type = ss_type
            .chars()
            .next()
            .and_then(SynsetType::from_char)
            .ok_or_else(|| fields.error(format!("unknown ss_type `{ss_type}`")))?;

        let w_cnt = fields.hex("w_cnt")?;
        let mut words = Vec::with_capacity(w_cnt as usize);
        for _ in 0..w_cnt {
            let word = fields.token("word")?;
            let lex_id = u8::try_from(fields.hex("lex_id")?)
                .map_err(|_| fields.error("lex_id out of range"))?;
            words.push((Span::of(source, bytes, word), lex_id));
        }

        let p_cnt: usize = fields.number("p_cnt")?;
        let mut pointers = Vec::with_capacity(p_cnt);
        for _ in 0..p_cnt {
            let symbol = fields.token("pointer symbol")?;
            let target_offset: u32 = fields.number("pointer offset")?;
            let target_pos = fields.token("pointer pos")?;
            let target_pos = target_pos
                .chars()
                .next()
                .and_then(Pos::from_char)
                .ok_or_else(|| fields.error(format!("unknown pointer pos `{target_pos}`")))?;
            let (src_word, dst_word) = decode_st(fields.token("source/target")?);
            pointers.push(PointerRecord {
                symbol: Span::of(source, bytes, symbol),
                target: SynsetId {
                    pos: target_pos,
                    offset: target_offset,
                },
                src_word,
                dst_word,
            });
        }
        // Verb frame lists may follow; they are not read.

        let gloss = gloss.trim();
        let (definition, examples) = split_gloss(gloss);
        let id = SynsetId { pos, offset };
        synsets.insert(
            id,
            SynsetRecord {
                id,
                lex_filenum,
                synset_type,
                words,
                pointers,
                gloss: Span::of(source, bytes, gloss),
                definition: Span::of(source, bytes, definition),
                examples: examples
                    .into_iter()
                    .map(|example| Span::of(source, bytes, example))
                    .collect(),
            },
        );
    }
    Ok(())
}

/// Definition (text before the first `;` outside quotes) and the non-empty
/// quoted examples of a gloss. Both borrow from `gloss`.
fn split_gloss(gloss: &str) -> (&str, Vec<&str>) {
    let mut definition_end = None;
    let mut examples = Vec::new();
    let mut open_quote: Option<usize> = None;
    for (idx, ch) in gloss.char_indices() {
        match (ch, open_quote) {
            ('"', None) => open_quote = Some(idx + 1),
            ('"', Some(start)) => {
                if idx > start {
                    examples.push(&gloss[start..idx]);
                }
                open_quote = None;
            }
            (';', None) if definition_end.is_none() => definition_end = Some(idx),
            _ => {}
        }
    }
    let definition = gloss[..definition_end.unwrap_or(gloss.len())].trim();
    (definition, examples)
}

/// `sense_key synset_offset sense_number tag_cnt`
fn read_index_sense(bytes: &[u8]) -> Result<SenseIndex> {
    let source = Source::IndexSense;
    let mut senses = SenseIndex::new();
    for record in records(source, bytes) {
        let (line, text) = record?;
        let mut fields = Fields::new(source, line, text);
        let raw_key = fields.token("sense key")?;
        let key = SenseKey::parse(raw_key)
            .ok_or_else(|| fields.error(format!("malformed sense key `{raw_key}`")))?;
        let offset: u32 = fields.number("synset_offset")?;
        let sense_number: u32 = fields.number("sense_number")?;
        let tag_cnt: u32 = fields.number("tag_cnt")?;
        if fields.iter.next().is_some() {
            return Err(fields.error("expected 4 fields"));
        }
        senses.insert(
            (key.synset_type.pos(), normalize_lemma(key.lemma), offset),
            SenseRecord {
                key: Span::of(source, bytes, raw_key),
                sense_number,
                tag_cnt,
            },
        );
    }
    Ok(senses)
}

/// Tag counts by sense key. Accepts `cntlist.rev` lines
/// (`sense_key sense_number tag_cnt`) and `cntlist` lines
/// (`tag_cnt sense_key sense_number`); anything else is skipped.
fn read_cntlist(bytes: &[u8]) -> HashMap<String, u32> {
    records(Source::Cntlist, bytes)
        .filter_map(Result::ok)
        .filter_map(|(_, text)| {
            let fields: Vec<&str> = text.split_ascii_whitespace().collect();
            let (key, count) = match fields.as_slice() {
                [key, _, count, ..] if key.contains('%') => (*key, *count),
                [count, key, _, ..] if key.contains('%') => (*key, *count),
                _ => return None,
            };
            Some((key.to_ascii_lowercase(), count.parse().ok()?))
        })
        .collect()
}

fn normalize_lemma(text: &str) -> String {
    text.trim().to_ascii_lowercase().replace(' ', "_")
}
