//! Operational HTTP endpoints.
//!
//! - `/healthz`      : liveness
//! - `/metrics`      : timer registry as Graphite plaintext
//! - `/metrics.json` : timer registry snapshots as JSON

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::app_state::AppState;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.registry().render();
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

pub async fn metrics_json(State(state): State<AppState>) -> Response {
    Json(state.registry().snapshot()).into_response()
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "not found")
}
