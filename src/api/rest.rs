// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`:
//
//   GET  /api/v1/health            status, version, weight, recent errors
//   GET  /api/v1/scan[?full=true]  latest stored pass
//   POST /api/v1/scan[?full=true]  run a pass now, store and return it
//
// A pass that could not run is a 503 with `{"error": ...}`; a pass that ran
// and found nothing is a 200 whose `message` is set.
//
// CORS is configured permissively; the radar is read-only.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::app_state::{AppState, LatestScan};
use crate::scanner::ScanResult;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/scan", get(latest_scan).post(trigger_scan))
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct ScanQuery {
    #[serde(default)]
    pub full: bool,
}

fn unavailable(message: impl Into<String>) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(serde_json::json!({ "error": message.into() })),
    )
        .into_response()
}

fn shaped(result: ScanResult, full: bool) -> ScanResult {
    if full {
        result
    } else {
        result.without_full()
    }
}

// =============================================================================
// Health
// =============================================================================

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.health())
}

// =============================================================================
// Scan
// =============================================================================

async fn latest_scan(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScanQuery>,
) -> Response {
    match state.latest() {
        LatestScan::Completed(result) => Json(shaped(result, query.full)).into_response(),
        LatestScan::Pending => unavailable("no scan pass has completed yet"),
        LatestScan::Failed(record) => unavailable(record.message),
    }
}

async fn trigger_scan(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ScanQuery>,
) -> Response {
    info!(full = query.full, "on-demand scan requested");
    match state.run_and_record().await {
        Ok(result) => Json(shaped(result, query.full)).into_response(),
        Err(e) => unavailable(format!("{e:#}")),
    }
}
