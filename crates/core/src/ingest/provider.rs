use crate::domain::snapshot::Snapshot;
use crate::ingest::types::CompanyStatements;
use anyhow::Result;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1500;

/// Upstream data source for one symbol at a time.
///
/// The provider is treated as opaque and unreliable: any call may fail
/// transiently or return a partially populated payload.
#[async_trait::async_trait]
pub trait QuoteProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Flat key-value payload of fundamental/price fields.
    async fn fetch_info(&self, symbol: &str) -> Result<Value>;

    /// News plus the three financial statement tables, unmodified.
    async fn fetch_statements(&self, symbol: &str) -> Result<CompanyStatements>;
}

/// Bounded retry with a fixed delay, sized to absorb the provider's informal
/// rate limiting. `retries` is the number of additional attempts after the
/// first one.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

/// Fetch a snapshot under the given retry policy.
///
/// The first attempt that yields a usable payload short-circuits the rest;
/// errors and empty payloads both consume an attempt, with the fixed delay
/// slept between attempts (blocking only the calling task). Exhaustion
/// returns `None`; the underlying error is logged, never propagated.
pub async fn fetch_snapshot_with(
    provider: &dyn QuoteProvider,
    symbol: &str,
    policy: RetryPolicy,
) -> Option<Snapshot> {
    let attempts = policy.retries + 1;
    for attempt in 1..=attempts {
        match provider.fetch_info(symbol).await {
            Ok(info) => {
                let snapshot = Snapshot::from_info(symbol, &info);
                if snapshot.is_usable() {
                    return Some(snapshot);
                }
                tracing::debug!(symbol, attempt, "provider returned an empty payload");
            }
            Err(err) => {
                tracing::debug!(symbol, attempt, error = %err, "provider fetch failed");
            }
        }

        if attempt < attempts {
            tokio::time::sleep(policy.delay).await;
        }
    }

    tracing::warn!(symbol, attempts, "data unavailable after retries; skipping");
    None
}

/// Fetch the statements bundle, degrading to the empty bundle on any error.
/// Display-layer data only: a missing bundle is never worth failing for.
pub async fn fetch_statements_with(
    provider: &dyn QuoteProvider,
    symbol: &str,
) -> CompanyStatements {
    match provider.fetch_statements(symbol).await {
        Ok(statements) => statements,
        Err(err) => {
            tracing::warn!(symbol, error = %err, "statements fetch failed; returning empty bundle");
            CompanyStatements::default()
        }
    }
}
