pub mod domain;
pub mod ingest;
pub mod scanner;
pub mod universe;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub provider_base_url: Option<String>,
        pub provider_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                provider_base_url: std::env::var("PROVIDER_BASE_URL").ok(),
                provider_api_key: std::env::var("PROVIDER_API_KEY").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_provider_base_url(&self) -> anyhow::Result<&str> {
            self.provider_base_url
                .as_deref()
                .context("PROVIDER_BASE_URL is required")
        }
    }
}
