//! Which tokens of a sentence make up the context of an ambiguous word.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use tracing::warn;

use crate::bag::{BagBuilder, BagOfWords};
use crate::config::ConfigError;
use crate::text::Sentence;

/// Context option as named on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContextOption {
    AllWords,
    AllWordsR,
    Window,
    Pos,
}

impl ContextOption {
    pub fn as_str(self) -> &'static str {
        match self {
            ContextOption::AllWords => "ALL_WORDS",
            ContextOption::AllWordsR => "ALL_WORDS_R",
            ContextOption::Window => "WINDOW",
            ContextOption::Pos => "POS",
        }
    }
}

impl FromStr for ContextOption {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL_WORDS" => Ok(ContextOption::AllWords),
            "ALL_WORDS_R" => Ok(ContextOption::AllWordsR),
            "WINDOW" => Ok(ContextOption::Window),
            "POS" => Ok(ContextOption::Pos),
            _ => Err(ConfigError::UnknownContext(s.to_string())),
        }
    }
}

impl fmt::Display for ContextOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated context policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContextPolicy {
    /// Every token of the sentence.
    #[default]
    AllWords,
    /// Every token except the ambiguous one.
    AllWordsRestricted,
    /// Tokens within `half_width` positions of the ambiguous one.
    Window { half_width: usize },
    /// Tokens tagged with the ambiguous word's POS.
    SamePos,
}

impl ContextPolicy {
    /// Validate an option; `window` only matters for [`ContextOption::Window`]
    /// and must then be odd and at least 3.
    pub fn new(option: ContextOption, window: usize) -> Result<Self, ConfigError> {
        Ok(match option {
            ContextOption::AllWords => ContextPolicy::AllWords,
            ContextOption::AllWordsR => ContextPolicy::AllWordsRestricted,
            ContextOption::Window => {
                if window < 3 || window % 2 == 0 {
                    return Err(ConfigError::InvalidWindow(window));
                }
                ContextPolicy::Window {
                    half_width: (window - 1) / 2,
                }
            }
            ContextOption::Pos => ContextPolicy::SamePos,
        })
    }

    pub fn option(self) -> ContextOption {
        match self {
            ContextPolicy::AllWords => ContextOption::AllWords,
            ContextPolicy::AllWordsRestricted => ContextOption::AllWordsR,
            ContextPolicy::Window { .. } => ContextOption::Window,
            ContextPolicy::SamePos => ContextOption::Pos,
        }
    }

    /// Full window size for window policies.
    pub fn window(self) -> Option<usize> {
        match self {
            ContextPolicy::Window { half_width } => Some(2 * half_width + 1),
            _ => None,
        }
    }
}

impl fmt::Display for ContextPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.window() {
            Some(n) => write!(f, "{}({n})", self.option()),
            None => f.write_str(self.option().as_str()),
        }
    }
}

impl Serialize for ContextPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Bag of the context of the token at `position`.
///
/// An out-of-range position yields an empty bag; corpus loading rejects such
/// records before they get here.
pub fn extract_context(
    bags: &BagBuilder,
    sentence: &Sentence,
    position: usize,
    policy: ContextPolicy,
) -> BagOfWords {
    let tokens = sentence.tokens();
    let Some(target) = tokens.get(position) else {
        warn!(
            "context position {position} outside a sentence of {} tokens",
            tokens.len()
        );
        return BagOfWords::new();
    };
    match policy {
        ContextPolicy::AllWords => bags.from_tokens(tokens),
        ContextPolicy::AllWordsRestricted => bags.from_tokens(
            tokens
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != position)
                .map(|(_, token)| token),
        ),
        ContextPolicy::Window { half_width } => {
            let start = position.saturating_sub(half_width);
            let end = (position + half_width + 1).min(tokens.len());
            bags.from_tokens(&tokens[start..end])
        }
        ContextPolicy::SamePos => match target.pos() {
            Some(pos) => bags.from_tokens(tokens.iter().filter(|t| t.pos() == Some(pos))),
            None => BagOfWords::new(),
        },
    }
}
