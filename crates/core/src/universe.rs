use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Load the ticker universe from a delimited file.
///
/// The first column is the symbol column regardless of what its header says;
/// the header row itself is always skipped. Rows with an empty symbol and
/// rows the csv parser cannot make sense of are dropped rather than fatal.
/// Duplicates are kept here; the scanner deduplicates so that callers
/// passing symbol lists from other sources get the same treatment.
pub fn load_universe(path: &Path) -> Result<Vec<String>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open universe file {}", path.display()))?;
    Ok(read_symbols(file))
}

fn read_symbols<R: Read>(input: R) -> Vec<String> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let mut out = Vec::new();
    let mut dropped: usize = 0;
    for record in rdr.records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                dropped += 1;
                continue;
            }
        };

        match record.get(0).map(str::trim) {
            Some(symbol) if !symbol.is_empty() => out.push(symbol.to_string()),
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, kept = out.len(), "dropped unusable universe rows");
    }
    out
}

/// Remove duplicate symbols, preserving first-seen order.
pub fn dedupe_symbols(symbols: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::BTreeSet::new();
    symbols
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
