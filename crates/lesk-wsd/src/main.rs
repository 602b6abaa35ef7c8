use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use lesk_wsd::config::{DEFAULT_TOP_K, ResourceArgs, RunArgs, init_tracing, validate_top_k};
use lesk_wsd::{Corpus, Metrics, PredictOptions, evaluate};

#[derive(Parser)]
#[command(name = "lesk")]
#[command(about = "Evaluate Lesk word sense disambiguation on a labelled corpus")]
struct Cli {
    /// Corpus file: sentence, count, then `<position> <lemma> <POS> <keys>` lines.
    corpus: PathBuf,
    #[command(flatten)]
    resources: ResourceArgs,
    #[command(flatten)]
    run: RunArgs,
    /// Number of top-ranked senses that count as predictions.
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,
    /// Print a JSON report instead of the tab-separated line.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    corpus: &'a str,
    options: PredictOptions,
    top_k: usize,
    occurrences: usize,
    #[serde(flatten)]
    metrics: Metrics,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let options = cli.run.options()?;
    let top_k = validate_top_k(cli.top_k)?;

    let lesk = cli.resources.build()?;
    let corpus = Corpus::load(&cli.corpus, lesk.annotator())
        .with_context(|| format!("loading corpus {}", cli.corpus.display()))?;

    let predictions = lesk.predict(&corpus, options);
    let metrics = evaluate(corpus.occurrences(), &predictions, top_k)?;
    info!(
        "P@{top_k}={:.4} R@{top_k}={:.4} F1@{top_k}={:.4}",
        metrics.precision, metrics.recall, metrics.f1
    );

    let name = corpus_name(&cli.corpus);
    if cli.json {
        let report = Report {
            corpus: &name,
            options,
            top_k,
            occurrences: corpus.occurrences().len(),
            metrics,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{}\t{:?}\t{:?}\t{:?}",
            name, metrics.precision, metrics.recall, metrics.f1
        );
    }
    Ok(())
}

fn corpus_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
