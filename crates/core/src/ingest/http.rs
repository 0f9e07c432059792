use crate::config::Settings;
use crate::ingest::provider::QuoteProvider;
use crate::ingest::types::CompanyStatements;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const INFO_PATH: &str = "/v1/info";
const STATEMENTS_PATH: &str = "/v1/statements";

/// HTTP JSON provider client.
///
/// Expects `GET {base}/v1/info/{symbol}` to return the flat key-value info
/// object and `GET {base}/v1/statements/{symbol}` the statements bundle.
#[derive(Debug, Clone)]
pub struct HttpJsonQuoteProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpJsonQuoteProvider {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_provider_base_url()?.to_string();
        let api_key = settings.provider_api_key.clone();

        let timeout_secs = std::env::var("PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build provider http client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    fn url(&self, path: &str, symbol: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url.trim_end_matches('/'),
            path,
            symbol.trim()
        )
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &self.api_key {
            headers.insert("x-api-key", HeaderValue::from_str(api_key)?);
        }
        Ok(headers)
    }

    async fn get_json(&self, url: String) -> Result<Value> {
        let res = self
            .http
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await
            .context("provider request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read provider response")?;
        let json = serde_json::from_str::<Value>(&text)
            .with_context(|| format!("provider response is not valid JSON: {text}"))?;

        anyhow::ensure!(status.is_success(), "provider HTTP {status}: {json}");
        Ok(json)
    }
}

#[async_trait::async_trait]
impl QuoteProvider for HttpJsonQuoteProvider {
    fn provider_name(&self) -> &'static str {
        "external_http_json"
    }

    async fn fetch_info(&self, symbol: &str) -> Result<Value> {
        anyhow::ensure!(!symbol.trim().is_empty(), "symbol must be non-empty");
        self.get_json(self.url(INFO_PATH, symbol)).await
    }

    async fn fetch_statements(&self, symbol: &str) -> Result<CompanyStatements> {
        anyhow::ensure!(!symbol.trim().is_empty(), "symbol must be non-empty");
        let raw = self.get_json(self.url(STATEMENTS_PATH, symbol)).await?;
        serde_json::from_value(raw).context("failed to parse statements bundle")
    }
}
