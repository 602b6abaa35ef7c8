use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use wordnet_db::WordNet;
use wordnet_types::Pos;

const USAGE: &str = "usage: cargo run -p wordnet-db --example senses -- <dict-dir> <lemma>...";

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let dict_dir = args.next().map(PathBuf::from).context(USAGE)?;
    let lemmas: Vec<String> = args.collect();
    if lemmas.is_empty() {
        bail!(USAGE);
    }

    let wn = WordNet::load(&dict_dir)
        .with_context(|| format!("loading WordNet from {}", dict_dir.display()))?;
    println!(
        "{}: {} synsets, {} index.sense lines, {} cntlist entries",
        dict_dir.display(),
        wn.synset_count(),
        wn.sense_index_count(),
        wn.tag_count_entries()
    );

    for lemma in &lemmas {
        for pos in Pos::ALL {
            let senses = wn.senses(pos, lemma);
            if senses.is_empty() {
                continue;
            }
            println!("\n{lemma} ({pos})");
            for sense in senses {
                let count = sense.tag_cnt.map(|c| c.to_string()).unwrap_or_default();
                println!(
                    "  {:<24} {:>4}  {}",
                    sense.sense_key, count, sense.synset.gloss.definition
                );
            }
        }
    }
    Ok(())
}
