//! Run options, resource locations and logging setup shared by the binaries.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;
use wordnet_db::{LoadMode, WordNet};
use wordnet_morphy::Morphy;

use crate::annotator::{Annotator, LexiconAnnotator, PlainAnnotator};
use crate::context::{ContextOption, ContextPolicy};
use crate::inventory::WordNetInventory;
use crate::predict::Lesk;
use crate::similarity::Metric;
use crate::stopwords::StopWords;

pub const DEFAULT_WORDNET_PATH: &str = "dict";
pub const DEFAULT_WORDNET_SYSTEM_PATH: &str = "/usr/share/wordnet";
pub const DEFAULT_STOPWORDS: &str = "data/stopwords.txt";
pub const DEFAULT_CONTEXT: &str = "ALL_WORDS";
pub const DEFAULT_WINDOW: usize = 3;
pub const DEFAULT_METRIC: &str = "JACCARD";
pub const DEFAULT_TOP_K: usize = 1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown context option `{0}` (expected ALL_WORDS, ALL_WORDS_R, WINDOW or POS)")]
    UnknownContext(String),
    #[error("unknown similarity metric `{0}` (expected JACCARD or COSINE)")]
    UnknownMetric(String),
    #[error("window size must be odd and at least 3, got {0}")]
    InvalidWindow(usize),
    #[error("top-k must be at least 1")]
    InvalidTopK,
    #[error("unknown wordnet load mode `{0}` (expected mmap or owned)")]
    UnknownLoadMode(String),
}

/// Validated options for one prediction run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PredictOptions {
    pub policy: ContextPolicy,
    pub metric: Metric,
}

impl PredictOptions {
    pub fn new(policy: ContextPolicy, metric: Metric) -> Self {
        Self { policy, metric }
    }

    /// Parse the textual options; the window size is checked only for
    /// `WINDOW`.
    pub fn parse(context: &str, window: usize, metric: &str) -> Result<Self, ConfigError> {
        let option: ContextOption = context.parse()?;
        Ok(Self {
            policy: ContextPolicy::new(option, window)?,
            metric: metric.parse()?,
        })
    }
}

pub fn validate_top_k(k: usize) -> Result<usize, ConfigError> {
    if k == 0 {
        return Err(ConfigError::InvalidTopK);
    }
    Ok(k)
}

pub fn parse_load_mode(raw: &str) -> Result<LoadMode, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "mmap" => Ok(LoadMode::Mmap),
        "owned" => Ok(LoadMode::Owned),
        _ => Err(ConfigError::UnknownLoadMode(raw.to_string())),
    }
}

pub fn default_wordnet_path() -> PathBuf {
    let local = PathBuf::from(DEFAULT_WORDNET_PATH);
    if local.exists() {
        return local;
    }
    PathBuf::from(DEFAULT_WORDNET_SYSTEM_PATH)
}

/// Log to stderr; stdout carries results.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .with_writer(std::io::stderr)
        .init();
}

/// Context and metric flags.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Context policy: ALL_WORDS, ALL_WORDS_R, WINDOW or POS.
    #[arg(long, default_value = DEFAULT_CONTEXT)]
    pub context: String,
    /// Window size for WINDOW contexts (odd, at least 3).
    #[arg(long, default_value_t = DEFAULT_WINDOW)]
    pub window: usize,
    /// Similarity metric: JACCARD or COSINE.
    #[arg(long, default_value = DEFAULT_METRIC)]
    pub metric: String,
}

impl RunArgs {
    pub fn options(&self) -> Result<PredictOptions, ConfigError> {
        PredictOptions::parse(&self.context, self.window, &self.metric)
    }
}

/// Where the dictionary and stopword list live.
#[derive(Args, Debug, Clone)]
pub struct ResourceArgs {
    /// WordNet dict directory (defaults to ./dict, then /usr/share/wordnet).
    #[arg(long, env = "WORDNET_DIR")]
    pub wordnet_dir: Option<PathBuf>,
    /// `mmap` or `owned`.
    #[arg(long, env = "WORDNET_LOAD_MODE", default_value = "mmap", value_parser = parse_load_mode)]
    pub wordnet_mode: LoadMode,
    #[arg(long, env = "STOPWORDS_PATH", default_value = DEFAULT_STOPWORDS)]
    pub stopwords: PathBuf,
    /// Tokenize only; skip morphy lemmatization and POS lookup.
    #[arg(long, default_value_t = false)]
    pub no_lemmatize: bool,
}

impl ResourceArgs {
    pub fn wordnet_path(&self) -> PathBuf {
        self.wordnet_dir.clone().unwrap_or_else(default_wordnet_path)
    }

    /// Load every shared resource and assemble the disambiguation context.
    pub fn build(&self) -> anyhow::Result<Lesk> {
        let wordnet_path = self.wordnet_path();
        info!(
            "using wordnet at {} (mode: {:?})",
            wordnet_path.display(),
            self.wordnet_mode
        );

        let stopwords = Arc::new(
            StopWords::load(&self.stopwords)
                .with_context(|| format!("loading stopwords from {}", self.stopwords.display()))?,
        );

        let wn_start = Instant::now();
        let wordnet = Arc::new(
            WordNet::load_with_mode(&wordnet_path, self.wordnet_mode)
                .with_context(|| format!("loading wordnet from {}", wordnet_path.display()))?,
        );
        info!(
            "wordnet loaded in {} ms ({} lemmas, {} synsets, {} sense keys)",
            wn_start.elapsed().as_millis(),
            wordnet.lemma_count(),
            wordnet.synset_count(),
            wordnet.sense_index_count()
        );

        let annotator: Arc<dyn Annotator> = if self.no_lemmatize {
            Arc::new(PlainAnnotator)
        } else {
            let morphy = Morphy::load(&wordnet_path)
                .with_context(|| format!("loading morphy exceptions from {}", wordnet_path.display()))?;
            info!("morphy loaded {} exceptions", morphy.exception_count());
            Arc::new(LexiconAnnotator::new(Arc::clone(&wordnet), Arc::new(morphy)))
        };

        let inventory = Arc::new(WordNetInventory::new(wordnet));
        Ok(Lesk::new(inventory, annotator, stopwords))
    }
}
