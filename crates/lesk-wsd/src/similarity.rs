//! Overlap measures between two bags of words.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::bag::BagOfWords;
use crate::config::ConfigError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Distinct shared words over distinct words in either bag.
    #[default]
    Jaccard,
    /// Term-frequency cosine.
    Cosine,
}

impl Metric {
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Jaccard => "JACCARD",
            Metric::Cosine => "COSINE",
        }
    }

    pub fn score(self, a: &BagOfWords, b: &BagOfWords) -> f64 {
        score(a, b, self)
    }
}

impl FromStr for Metric {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "JACCARD" => Ok(Metric::Jaccard),
            "COSINE" => Ok(Metric::Cosine),
            _ => Err(ConfigError::UnknownMetric(s.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Similarity in `[0, 1]`; symmetric in its arguments.
pub fn score(a: &BagOfWords, b: &BagOfWords, metric: Metric) -> f64 {
    let raw = match metric {
        Metric::Jaccard => jaccard(a, b),
        Metric::Cosine => cosine(a, b),
    };
    raw.clamp(0.0, 1.0)
}

pub fn jaccard(a: &BagOfWords, b: &BagOfWords) -> f64 {
    let (small, large) = if a.distinct() <= b.distinct() {
        (a, b)
    } else {
        (b, a)
    };
    let shared = small.words().filter(|w| large.contains(w)).count();
    let union = a.distinct() + b.distinct() - shared;
    if union == 0 {
        return 0.0;
    }
    shared as f64 / union as f64
}

pub fn cosine(a: &BagOfWords, b: &BagOfWords) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let dot: u64 = a
        .iter()
        .map(|(word, count)| u64::from(count) * u64::from(b.count(word)))
        .sum();
    if dot == 0 {
        return 0.0;
    }
    let norm_sq = |bag: &BagOfWords| -> u64 { bag.iter().map(|(_, c)| u64::from(c).pow(2)).sum() };
    let (na, nb) = (norm_sq(a), norm_sq(b));
    // Identical bags give na == nb == dot, so this is exactly 1.0.
    dot as f64 / ((na as f64) * (nb as f64)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag(words: &[&str]) -> BagOfWords {
        words.iter().copied().collect()
    }

    #[test]
    fn jaccard_counts_distinct_words() {
        let context = bag(&["bank", "river", "flow"]);
        let gloss = bag(&["sloping", "land", "river", "water", "flow"]);
        assert_eq!(score(&context, &gloss, Metric::Jaccard), 2.0 / 6.0);
        let repeated = bag(&["river", "river", "flow"]);
        assert_eq!(jaccard(&repeated, &bag(&["river", "flow"])), 1.0);
    }

    #[test]
    fn disjoint_bags_score_zero() {
        let context = bag(&["bank", "river", "flow"]);
        let gloss = bag(&["financial", "institution", "accept", "deposit"]);
        for metric in [Metric::Jaccard, Metric::Cosine] {
            assert_eq!(score(&context, &gloss, metric), 0.0);
        }
    }

    #[test]
    fn empty_bags_score_zero() {
        let empty = BagOfWords::new();
        let some = bag(&["bank"]);
        for metric in [Metric::Jaccard, Metric::Cosine] {
            assert_eq!(score(&empty, &empty, metric), 0.0);
            assert_eq!(score(&empty, &some, metric), 0.0);
            assert_eq!(score(&some, &empty, metric), 0.0);
        }
    }

    #[test]
    fn identical_bags_score_one() {
        let a = bag(&["take", "bus", "bus", "work", "travel", "vehicle", "vehicle", "vehicle"]);
        for metric in [Metric::Jaccard, Metric::Cosine] {
            assert_eq!(score(&a, &a, metric), 1.0);
        }
    }

    #[test]
    fn metrics_are_symmetric_and_bounded() {
        let a = bag(&["river", "river", "bank", "flow", "water"]);
        let b = bag(&["water", "flow", "flow", "land"]);
        for metric in [Metric::Jaccard, Metric::Cosine] {
            let ab = score(&a, &b, metric);
            let ba = score(&b, &a, metric);
            assert_eq!(ab, ba);
            assert!((0.0..=1.0).contains(&ab));
        }
    }

    #[test]
    fn cosine_weights_term_frequency() {
        let a = bag(&["river", "river", "bank"]);
        let b = bag(&["river"]);
        let expected = 2.0 / 5.0_f64.sqrt();
        assert!((cosine(&a, &b) - expected).abs() < 1e-12);
    }

    #[test]
    fn parses_metric_names() {
        assert_eq!("jaccard".parse::<Metric>().unwrap(), Metric::Jaccard);
        assert_eq!("COSINE".parse::<Metric>().unwrap(), Metric::Cosine);
        assert!(matches!(
            "dice".parse::<Metric>(),
            Err(ConfigError::UnknownMetric(name)) if name == "dice"
        ));
    }
}
