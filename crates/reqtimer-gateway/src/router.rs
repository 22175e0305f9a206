//! Axum router wiring.
//!
//! Application routes live under the configured context root; the request
//! timer wraps the whole router, fallback included, as its outermost layer.

use axum::{routing::get, Router};

use crate::{app_state::AppState, demo, filter::RequestTimerLayer, ops};

pub fn build_router(state: AppState) -> Router {
    let context_path = state.cfg().server.context_path.clone();
    let timer = RequestTimerLayer::new(state.registry(), context_path.clone());

    let app = Router::new()
        .route("/hello/:name", get(demo::hello))
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .route("/metrics.json", get(ops::metrics_json))
        .with_state(state);

    let app = if context_path.is_empty() {
        app
    } else {
        Router::new().nest(&context_path, app)
    };

    app.fallback(ops::not_found).layer(timer)
}
