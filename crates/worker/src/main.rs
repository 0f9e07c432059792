use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nivesh_core::ingest::http::HttpJsonQuoteProvider;
use nivesh_core::ingest::provider::{RetryPolicy, DEFAULT_RETRIES, DEFAULT_RETRY_DELAY_MS};
use nivesh_core::scanner::{scan_universe, ScanOptions, DEFAULT_PACING_MS, DEFAULT_TOP_N};
use nivesh_core::universe::load_universe;

#[derive(Debug, Parser)]
#[command(name = "nivesh_worker")]
struct Args {
    /// Universe file (delimited; first column is the ticker symbol).
    #[arg(long)]
    universe: PathBuf,

    /// Number of top-ranked BUY / STRONG BUY entries to keep.
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top: usize,

    /// Fixed pause between consecutive symbol fetches, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_PACING_MS)]
    pacing_ms: u64,

    /// Additional fetch attempts per symbol after the first one.
    #[arg(long, default_value_t = DEFAULT_RETRIES)]
    retries: u32,

    /// Fixed delay between fetch attempts, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_RETRY_DELAY_MS)]
    retry_delay_ms: u64,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = nivesh_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let run = run(&settings, &args).await;
    if let Err(err) = &run {
        sentry_anyhow::capture_anyhow(err);
    }
    run
}

async fn run(settings: &nivesh_core::config::Settings, args: &Args) -> anyhow::Result<()> {
    let provider = HttpJsonQuoteProvider::from_settings(settings)?;

    let symbols = load_universe(&args.universe)?;
    tracing::info!(
        universe = %args.universe.display(),
        rows = symbols.len(),
        "loaded universe file"
    );

    let opts = ScanOptions {
        top_n: args.top,
        pacing: Duration::from_millis(args.pacing_ms),
        retry: RetryPolicy {
            retries: args.retries,
            delay: Duration::from_millis(args.retry_delay_ms),
        },
    };

    let entries = scan_universe(&provider, symbols, opts, |processed, total| {
        tracing::debug!(processed, total, "scan progress");
    })
    .await;

    if entries.is_empty() {
        tracing::info!("no BUY / STRONG BUY candidates found");
    }

    let out = if args.pretty {
        serde_json::to_string_pretty(&entries)
    } else {
        serde_json::to_string(&entries)
    }
    .context("failed to serialize scan result")?;
    println!("{out}");

    Ok(())
}

fn init_sentry(settings: &nivesh_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
