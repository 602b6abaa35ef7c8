//! Lesk word sense disambiguation over WordNet glosses.
//!
//! Each candidate sense of an ambiguous word gets a bag-of-words signature
//! built from its gloss; the sense whose signature overlaps most with the
//! word's sentence context wins. [`Lesk`] holds the shared resources,
//! [`Corpus`] reads labelled test data and [`evaluate`] reports top-K
//! precision, recall and F1.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use lesk_wsd::{
//!     Annotator, Lesk, MemoryInventory, PlainAnnotator, PosTag, PredictOptions, SenseCandidate,
//!     StopWords, Target,
//! };
//! use wordnet_types::Pos;
//!
//! let inventory = MemoryInventory::new()
//!     .with_sense("bank", Pos::Noun, SenseCandidate::new("bank%1:14:00::", "a financial institution"))
//!     .with_sense("bank", Pos::Noun, SenseCandidate::new("bank%1:17:01::", "sloping land beside a river"));
//! let lesk = Lesk::new(
//!     Arc::new(inventory),
//!     Arc::new(PlainAnnotator),
//!     Arc::new(StopWords::from_words(["a", "the", "beside"])),
//! );
//! let sentence = PlainAnnotator.annotate_line("the river bank");
//! let target = Target::new("bank", PosTag::Noun);
//! let scores = lesk.score(&sentence, 2, &target, PredictOptions::default());
//! assert_eq!(scores.ranked()[0].sense_key, "bank%1:17:01::");
//! ```

pub mod annotator;
pub mod bag;
pub mod config;
pub mod context;
pub mod corpus;
pub mod eval;
pub mod handlers;
pub mod inventory;
pub mod predict;
pub mod signature;
pub mod similarity;
pub mod stopwords;
pub mod text;

pub use annotator::{Annotator, LexiconAnnotator, PlainAnnotator};
pub use bag::{BagBuilder, BagOfWords};
pub use config::{ConfigError, PredictOptions};
pub use context::{ContextOption, ContextPolicy, extract_context};
pub use corpus::{AmbiguousOccurrence, Corpus, CorpusError};
pub use eval::{Metrics, evaluate, evaluate_one};
pub use handlers::{AppState, router};
pub use inventory::{GlossSource, MemoryInventory, SenseCandidate, SenseInventory, WordNetInventory};
pub use predict::{Disambiguation, Lesk, PredictionMap, RankedSense, ScoredSense};
pub use signature::{Signature, SignatureGenerator, Target};
pub use similarity::Metric;
pub use stopwords::{StopWords, StopwordsError};
pub use text::{PosTag, Sentence, Token};
