//! reqtimer gateway
//!
//! - Demo endpoint: /hello/{name}?avgDuration=..&stdDev=..
//! - Every request timed under `timer.<METHOD>.<STATUS>.<route>`
//! - Timers logged once per `metrics.report_interval_ms`, served on /metrics

use tracing_subscriber::{fmt, EnvFilter};

use reqtimer_gateway::{app_state, config, obs, router};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = config::config_path();
    let cfg = config::load_from_file(&path).expect("config load failed");
    let listen = cfg
        .server
        .listen_addr()
        .expect("server.listen must be a valid SocketAddr");

    let state = app_state::AppState::new(cfg).expect("app state init failed");
    let _reporter = obs::spawn_reporter(state.registry(), state.cfg().metrics.report_interval());
    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "reqtimer-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}
