//! HTTP API for the log
//!
//! `POST /` appends a record, `GET /` reads one back. Both take a JSON body.
//! Handlers decode the body, make exactly one call into the [`Log`], and encode
//! the outcome; errors become responses through [`Error`]'s `IntoResponse`.

use crate::api::types::{ConsumeRequest, ConsumeResponse, ProduceRequest, ProduceResponse};
use crate::common::{request_tracing_middleware, Error, MetricsRegistry, Result};
use crate::log::Log;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

/// Shared state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub log: Arc<Log>,
    pub metrics: Arc<MetricsRegistry>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(log: Arc<Log>) -> Self {
        Self {
            log,
            metrics: Arc::new(MetricsRegistry::new()),
            started_at: Utc::now(),
        }
    }
}

/// Creates the HTTP router with all public endpoints.
///
/// Request bodies are unbounded unless `max_body_bytes` is set, in which case
/// larger bodies are answered with 413.
pub fn create_router(state: AppState, max_body_bytes: Option<usize>) -> Router {
    let router = Router::new()
        .route("/", get(handle_consume).post(handle_produce))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            request_tracing_middleware,
        ))
        .layer(DefaultBodyLimit::disable())
        .with_state(state);

    match max_body_bytes {
        Some(limit) => router.layer(RequestBodyLimitLayer::new(limit)),
        None => router,
    }
}

/// Handle POST /
pub async fn handle_produce(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let request: ProduceRequest = decode(&body)?;

    let size = request.record.value.len() as u64;
    let offset = state.log.append(request.record)?;

    state.metrics.records_appended.inc();
    state.metrics.bytes_written.add(size);

    encode(&ProduceResponse { offset })
}

/// Handle GET /
pub async fn handle_consume(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let request: ConsumeRequest = decode(&body)?;

    let record = state.log.read(request.offset).inspect_err(|e| {
        if matches!(e, Error::OffsetNotFound(_)) {
            state.metrics.reads_not_found.inc();
        }
    })?;

    state.metrics.records_read.inc();
    state.metrics.bytes_read.add(record.value.len() as u64);

    encode(&ConsumeResponse { record })
}

/// Health check with the current log size
async fn health(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let records = state.log.len()?;

    Ok(axum::Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "records": records,
        "started_at": state.started_at.to_rfc3339(),
    })))
}

/// Prometheus /metrics
async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let records = state.log.len()?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.to_prometheus(records),
    ))
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| Error::MalformedRequest(e.to_string()))
}

fn encode<T: Serialize>(value: &T) -> Result<Response> {
    let body = serde_json::to_vec(value)?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}
