//! Top-K precision, recall and F1 against labelled senses.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::{ConfigError, validate_top_k};
use crate::corpus::AmbiguousOccurrence;
use crate::predict::PredictionMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Metrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl Metrics {
    pub fn new(precision: f64, recall: f64) -> Self {
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        Self {
            precision,
            recall,
            f1,
        }
    }
}

/// Metrics for one word. `k` must be at least 1.
pub fn evaluate_one(ground_truth: &BTreeSet<String>, predictions: &PredictionMap, k: usize) -> Metrics {
    let top = predictions.top_k(k);
    if top.is_empty() || ground_truth.is_empty() {
        return Metrics::default();
    }
    let hits = top
        .iter()
        .filter(|sense| ground_truth.contains(&sense.sense_key))
        .count() as f64;
    Metrics::new(hits / top.len() as f64, hits / ground_truth.len() as f64)
}

/// Arithmetic mean of the per-word metrics over every occurrence, including
/// words without candidates. An empty corpus scores 0.
pub fn evaluate(
    occurrences: &[AmbiguousOccurrence],
    predictions: &[PredictionMap],
    k: usize,
) -> Result<Metrics, ConfigError> {
    let k = validate_top_k(k)?;
    let n = occurrences.len().min(predictions.len());
    if n == 0 {
        return Ok(Metrics::default());
    }
    let (p, r, f) = occurrences
        .iter()
        .zip(predictions)
        .map(|(occurrence, map)| evaluate_one(&occurrence.ground_truth, map, k))
        .fold((0.0, 0.0, 0.0), |(p, r, f), m| {
            (p + m.precision, r + m.recall, f + m.f1)
        });
    let n = n as f64;
    Ok(Metrics {
        precision: p / n,
        recall: r / n,
        f1: f / n,
    })
}
