use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nivesh_core::domain::scoring::{score_snapshot, ScoreResult};
use nivesh_core::domain::snapshot::Snapshot;
use nivesh_core::ingest::http::HttpJsonQuoteProvider;
use nivesh_core::ingest::provider::{fetch_snapshot_with, fetch_statements_with, RetryPolicy};
use nivesh_core::ingest::types::CompanyStatements;
use nivesh_core::scanner::{scan_universe, ScanEntry, ScanOptions};

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

    let provider = match HttpJsonQuoteProvider::from_settings(&settings) {
        Ok(p) => Some(Arc::new(p)),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "provider config missing; starting API in degraded mode");
            None
        }
    };

    let state = AppState { provider };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/analysis/:symbol", get(get_analysis))
        .route("/statements/:symbol", get(get_statements))
        .route("/scan", post(post_scan))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    provider: Option<Arc<HttpJsonQuoteProvider>>,
}

#[derive(Debug, Serialize)]
struct ApiAnalysis {
    symbol: String,
    snapshot: Snapshot,
    score: ScoreResult,
}

async fn get_analysis(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiAnalysis>, StatusCode> {
    let Some(provider) = &state.provider else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let symbol = symbol.trim().to_string();
    if symbol.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    // Unavailable and not-found both surface as 404.
    let snapshot = fetch_snapshot_with(provider.as_ref(), &symbol, RetryPolicy::default())
        .await
        .ok_or(StatusCode::NOT_FOUND)?;

    let score = score_snapshot(&snapshot);
    Ok(Json(ApiAnalysis {
        symbol,
        snapshot,
        score,
    }))
}

async fn get_statements(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<CompanyStatements>, StatusCode> {
    let Some(provider) = &state.provider else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let symbol = symbol.trim().to_string();
    if symbol.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    // Degrades to the empty bundle on provider failure; always 200.
    Ok(Json(fetch_statements_with(provider.as_ref(), &symbol).await))
}

#[derive(Debug, Deserialize)]
struct ScanRequest {
    symbols: Vec<String>,
    top_n: Option<usize>,
    pacing_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
struct ScanResponse {
    scanned: usize,
    entries: Vec<ScanEntry>,
}

async fn post_scan(
    State(state): State<AppState>,
    Json(req): Json<ScanRequest>,
) -> Result<Json<ScanResponse>, StatusCode> {
    let Some(provider) = &state.provider else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let mut opts = ScanOptions::default();
    if let Some(top_n) = req.top_n {
        opts.top_n = top_n;
    }
    if let Some(ms) = req.pacing_ms {
        opts.pacing = Duration::from_millis(ms);
    }

    let mut scanned = 0;
    let entries = scan_universe(provider.as_ref(), req.symbols, opts, |processed, _total| {
        scanned = processed;
    })
    .await;

    Ok(Json(ScanResponse { scanned, entries }))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
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
