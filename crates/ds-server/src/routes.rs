//! HTTP trigger surface: health, manual refresh, signed webhook, SSE events.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use ds_core::tokens::{TokenSet, TokenStats};
use ds_sync::{
    BroadcastNotifier, DegradedReason, Pipeline, SIGNATURE_HEADER, SourceOrigin, SourceProvider,
    SyncReport, TOKENS_UPDATED, verify_signature,
};
use futures::stream::Stream;
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

// ── State ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
    source: Arc<dyn SourceProvider>,
    notifier: BroadcastNotifier,
    /// Held for the duration of a run; at most one run at a time.
    gate: Arc<Mutex<()>>,
}

impl AppState {
    /// The pipeline should already publish through `notifier`.
    pub fn new(
        pipeline: Pipeline,
        source: Arc<dyn SourceProvider>,
        notifier: BroadcastNotifier,
    ) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            source,
            notifier,
            gate: Arc::new(Mutex::new(())),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/sync-tokens", get(sync_tokens).post(sync_tokens))
        .route("/figma-webhook", post(figma_webhook))
        .route("/events", get(events))
        .with_state(state)
}

// ── Responses ────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Health {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    source: String,
    webhook_verification: bool,
    subscribers: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SyncResponse {
    success: bool,
    degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    degraded_reason: Option<DegradedReason>,
    origin: SourceOrigin,
    stats: TokenStats,
    written: Vec<String>,
    unchanged: Vec<String>,
    tokens: TokenSet,
}

impl From<SyncReport> for SyncResponse {
    fn from(report: SyncReport) -> Self {
        let outcome = report.outcome;
        Self {
            success: true,
            degraded: outcome.degraded.is_some(),
            degraded_reason: outcome.degraded,
            origin: outcome.origin,
            stats: outcome.stats,
            written: report.write.written,
            unchanged: report.write.unchanged,
            tokens: outcome.tokens,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

fn failure(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: error.into(),
        }),
    )
        .into_response()
}

// ── Handlers ─────────────────────────────────────────────────

/// GET /
async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        service: "design-sync",
        version: env!("CARGO_PKG_VERSION"),
        source: state.source.describe(),
        webhook_verification: state.pipeline.config().webhook_secret.is_some(),
        subscribers: state.notifier.subscribers(),
    })
}

/// GET|POST /sync-tokens
async fn sync_tokens(State(state): State<AppState>) -> Response {
    log::info!("manual token sync requested");
    run_sync(&state).await
}

/// POST /figma-webhook
async fn figma_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(secret) = &state.pipeline.config().webhook_secret {
        let header = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok());
        if let Err(err) = verify_signature(secret.as_bytes(), &body, header) {
            log::warn!("rejected webhook: {err}");
            return failure(StatusCode::UNAUTHORIZED, err.to_string());
        }
    }

    let event_type = serde_json::from_slice::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("event_type")?.as_str().map(str::to_owned));
    log::info!(
        "webhook received ({}), syncing tokens",
        event_type.as_deref().unwrap_or("unknown event")
    );
    run_sync(&state).await
}

/// GET /events
async fn events(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.notifier.subscribe();
    log::info!("event subscriber connected ({} total)", state.notifier.subscribers());

    let hello = Event::default()
        .event("connected")
        .data(state.notifier.subscribers().to_string());
    let updates = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(update) => Event::default()
            .event(TOKENS_UPDATED)
            .json_data(&*update)
            .ok()
            .map(Ok),
        Err(lagged) => {
            log::warn!("event subscriber fell behind: {lagged}");
            None
        }
    });

    Sse::new(tokio_stream::once(Ok(hello)).chain(updates)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

async fn run_sync(state: &AppState) -> Response {
    let Ok(_running) = state.gate.try_lock() else {
        log::warn!("sync already running, rejecting trigger");
        return failure(StatusCode::CONFLICT, "a token sync is already running");
    };

    match state.pipeline.sync(state.source.as_ref()).await {
        Ok(report) => Json(SyncResponse::from(report)).into_response(),
        Err(err) => {
            log::error!("token sync failed: {err}");
            failure(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}
