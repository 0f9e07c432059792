use crate::domain::scoring::{score_snapshot, ScoreResult};
use crate::ingest::provider::{fetch_snapshot_with, QuoteProvider, RetryPolicy};
use crate::universe::dedupe_symbols;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TOP_N: usize = 50;
pub const DEFAULT_PACING_MS: u64 = 250;

const PROGRESS_LOG_EVERY: usize = 25;

/// One retained screener hit: a symbol that scored BUY or STRONG BUY.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanEntry {
    pub symbol: String,
    pub score: ScoreResult,
}

#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    /// Number of top-ranked entries to keep.
    pub top_n: usize,

    /// Fixed pause between consecutive symbol fetches. The provider rate
    /// limits informally, so the scan stays strictly sequential and paced.
    pub pacing: Duration,

    pub retry: RetryPolicy,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            pacing: Duration::from_millis(DEFAULT_PACING_MS),
            retry: RetryPolicy::default(),
        }
    }
}

/// Scan a symbol universe and return the top BUY/STRONG-BUY entries ranked
/// by final score.
///
/// Symbols are deduplicated preserving first-seen order, then fetched one at
/// a time. An unavailable symbol is skipped and contributes nothing; one bad
/// symbol can never abort the rest of the scan. `on_progress` fires after
/// every symbol, success or not, with a monotone (processed, total) pair.
pub async fn scan_universe<F>(
    provider: &dyn QuoteProvider,
    symbols: Vec<String>,
    opts: ScanOptions,
    mut on_progress: F,
) -> Vec<ScanEntry>
where
    F: FnMut(usize, usize),
{
    let symbols = dedupe_symbols(symbols);
    let total = symbols.len();
    let mut entries: Vec<ScanEntry> = Vec::new();
    let mut skipped: usize = 0;

    for (idx, symbol) in symbols.into_iter().enumerate() {
        if idx != 0 && !opts.pacing.is_zero() {
            tokio::time::sleep(opts.pacing).await;
        }

        match fetch_snapshot_with(provider, &symbol, opts.retry).await {
            Some(snapshot) => {
                let score = score_snapshot(&snapshot);
                if score.recommendation.is_buy_grade() {
                    entries.push(ScanEntry { symbol, score });
                }
            }
            // Not-found and retry-exhausted both land here; neither aborts the scan.
            None => skipped += 1,
        }

        let processed = idx + 1;
        on_progress(processed, total);
        if processed == 1 || processed == total || processed % PROGRESS_LOG_EVERY == 0 {
            tracing::info!(
                processed,
                total,
                candidates = entries.len(),
                skipped,
                "universe scan progress"
            );
        }
    }

    // Stable sort: ties keep their universe order.
    entries.sort_by(|a, b| {
        b.score
            .final_score
            .partial_cmp(&a.score.final_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries.truncate(opts.top_n);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use serde_json::{json, Value};
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Symbol-keyed fake: missing symbols fail every attempt.
    struct MapProvider {
        payloads: BTreeMap<String, Value>,
        fetch_counts: Mutex<BTreeMap<String, usize>>,
    }

    impl MapProvider {
        fn new(payloads: Vec<(&str, Value)>) -> Self {
            Self {
                payloads: payloads
                    .into_iter()
                    .map(|(s, v)| (s.to_string(), v))
                    .collect(),
                fetch_counts: Mutex::new(BTreeMap::new()),
            }
        }

        fn fetches(&self, symbol: &str) -> usize {
            self.fetch_counts
                .lock()
                .unwrap()
                .get(symbol)
                .copied()
                .unwrap_or(0)
        }
    }

    #[async_trait::async_trait]
    impl crate::ingest::provider::QuoteProvider for MapProvider {
        fn provider_name(&self) -> &'static str {
            "map"
        }

        async fn fetch_info(&self, symbol: &str) -> Result<Value> {
            *self
                .fetch_counts
                .lock()
                .unwrap()
                .entry(symbol.to_string())
                .or_insert(0) += 1;
            self.payloads
                .get(symbol)
                .cloned()
                .ok_or_else(|| anyhow!("no data for {symbol}"))
        }

        async fn fetch_statements(
            &self,
            _symbol: &str,
        ) -> Result<crate::ingest::types::CompanyStatements> {
            Ok(Default::default())
        }
    }

    fn buy_payload(price: f64) -> Value {
        // intrinsic 10, growth 10, risk 10, valuation ~1.3; momentum tracks
        // the price inside the 100..200 band.
        json!({
            "currentPrice": price,
            "trailingEps": 10.0,
            "bookValue": 80.0,
            "returnOnEquity": 0.9,
            "returnOnCapitalEmployed": 0.9,
            "revenueGrowth": 0.5,
            "profitMargins": 0.3,
            "trailingPE": 20.0,
            "fiftyTwoWeekHigh": 200.0,
            "fiftyTwoWeekLow": 100.0,
        })
    }

    fn fast_opts() -> ScanOptions {
        ScanOptions {
            top_n: DEFAULT_TOP_N,
            pacing: Duration::ZERO,
            retry: RetryPolicy {
                retries: 0,
                delay: Duration::ZERO,
            },
        }
    }

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn skips_unavailable_symbols_and_reports_full_progress() {
        let provider = MapProvider::new(vec![
            ("NSE:A", buy_payload(190.0)),
            ("NSE:C", buy_payload(180.0)),
        ]);

        let mut seen = Vec::new();
        let entries = scan_universe(
            &provider,
            symbols(&["NSE:A", "NSE:B", "NSE:C"]),
            fast_opts(),
            |processed, total| seen.push((processed, total)),
        )
        .await;

        let out: Vec<&str> = entries.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(out, vec!["NSE:A", "NSE:C"]);
        assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_symbols_are_scanned_once() {
        let provider = MapProvider::new(vec![("NSE:A", buy_payload(190.0))]);

        let entries = scan_universe(
            &provider,
            symbols(&["NSE:A", "NSE:A", "NSE:A"]),
            fast_opts(),
            |_, _| {},
        )
        .await;

        assert_eq!(entries.len(), 1);
        assert_eq!(provider.fetches("NSE:A"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn ranks_descending_and_truncates() {
        let provider = MapProvider::new(vec![
            ("NSE:LOW", buy_payload(160.0)),
            ("NSE:HIGH", buy_payload(200.0)),
            ("NSE:MID", buy_payload(180.0)),
        ]);

        let mut opts = fast_opts();
        opts.top_n = 2;
        let entries = scan_universe(
            &provider,
            symbols(&["NSE:LOW", "NSE:HIGH", "NSE:MID"]),
            opts,
            |_, _| {},
        )
        .await;

        let out: Vec<&str> = entries.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(out, vec!["NSE:HIGH", "NSE:MID"]);
    }

    #[tokio::test(start_paused = true)]
    async fn ties_keep_universe_order() {
        let provider = MapProvider::new(vec![
            ("NSE:B", buy_payload(190.0)),
            ("NSE:A", buy_payload(190.0)),
        ]);

        let entries = scan_universe(
            &provider,
            symbols(&["NSE:B", "NSE:A"]),
            fast_opts(),
            |_, _| {},
        )
        .await;

        let out: Vec<&str> = entries.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(out, vec!["NSE:B", "NSE:A"]);
    }

    #[tokio::test(start_paused = true)]
    async fn non_buy_grades_are_filtered_out() {
        // Price-only payload scores SELL.
        let provider = MapProvider::new(vec![
            ("NSE:GOOD", buy_payload(190.0)),
            ("NSE:WEAK", json!({"currentPrice": 100.0})),
        ]);

        let entries = scan_universe(
            &provider,
            symbols(&["NSE:GOOD", "NSE:WEAK"]),
            fast_opts(),
            |_, _| {},
        )
        .await;

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].symbol, "NSE:GOOD");
        assert!(entries[0].score.recommendation.is_buy_grade());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_universe_yields_empty_result() {
        let provider = MapProvider::new(vec![]);
        let entries = scan_universe(&provider, Vec::new(), fast_opts(), |_, _| {}).await;
        assert!(entries.is_empty());
    }
}
