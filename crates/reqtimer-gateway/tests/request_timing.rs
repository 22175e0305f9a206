//! End-to-end timing through the axum router.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use reqtimer_gateway::app_state::AppState;
use reqtimer_gateway::obs::TimerRegistry;
use reqtimer_gateway::{config, router};

const FAST_DEMO: &str = "version: 1\ndemo:\n  avg_duration_ms: 0\n  std_dev_ms: 0\n";

fn app(yaml: &str) -> (Router, Arc<TimerRegistry>) {
    let cfg = config::load_from_str(yaml).unwrap();
    let state = AppState::new(cfg).unwrap();
    let registry = state.registry();
    (router::build_router(state), registry)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn count(registry: &TimerRegistry, key: &str) -> u64 {
    registry.get(key).map(|t| t.count).unwrap_or(0)
}

#[tokio::test]
async fn matched_route_is_named_by_pattern() {
    let (app, registry) = app(FAST_DEMO);

    let (status, body) = get(&app, "/hello/bob").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Hello bob!");

    get(&app, "/hello/alice").await;
    assert_eq!(count(&registry, "timer.GET.200.hello.name"), 2);
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn unmatched_paths_share_the_unmapped_key() {
    let (app, registry) = app(FAST_DEMO);

    let (status, _) = get(&app, "/totally/random/xyz").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    get(&app, "/wp-login.php").await;

    assert_eq!(count(&registry, "timer.GET.404.unmapped"), 2);
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn rejected_query_keeps_route_pattern() {
    let (app, registry) = app(FAST_DEMO);

    let (status, _) = get(&app, "/hello/bob?avgDuration=soon").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(count(&registry, "timer.GET.400.hello.name"), 1);
}

#[tokio::test]
async fn query_overrides_demo_latency() {
    let (app, registry) = app(FAST_DEMO);

    let (status, _) = get(&app, "/hello/bob?avgDuration=15&stdDev=0").await;
    assert_eq!(status, StatusCode::OK);
    let t = registry.get("timer.GET.200.hello.name").unwrap();
    assert!(t.min_micros >= 15_000, "measured {}us", t.min_micros);
}

#[tokio::test]
async fn method_mismatch_is_unmapped() {
    let (app, registry) = app(FAST_DEMO);

    let req = Request::builder()
        .method("POST")
        .uri("/hello/bob")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(count(&registry, "timer.POST.405.unmapped"), 1);
    assert_eq!(count(&registry, "timer.POST.405.hello.name"), 0);
}

#[tokio::test]
async fn context_root_is_not_part_of_the_key() {
    let (app, registry) = app(
        "version: 1\nserver:\n  context_path: \"/app\"\ndemo:\n  avg_duration_ms: 0\n  std_dev_ms: 0\n",
    );

    let (status, _) = get(&app, "/app/hello/bob").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count(&registry, "timer.GET.200.hello.name"), 1);

    let (status, _) = get(&app, "/hello/bob").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(count(&registry, "timer.GET.404.unmapped"), 1);
}

#[tokio::test]
async fn metrics_endpoint_renders_earlier_requests() {
    let (app, _registry) = app(FAST_DEMO);

    get(&app, "/hello/bob").await;
    let (status, body) = get(&app, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("timer.GET.200.hello.name.count 1"), "{body}");
}

#[tokio::test]
async fn metrics_json_lists_snapshots() {
    let (app, _registry) = app(FAST_DEMO);

    get(&app, "/healthz").await;
    let (_, body) = get(&app, "/metrics.json").await;

    let v: serde_json::Value = serde_json::from_str(&body).unwrap();
    let names: Vec<&str> = v
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["timer.GET.200.healthz"]);
}

#[tokio::test]
async fn registry_rejection_does_not_affect_response() {
    let (app, registry) = app(
        "version: 1\nmetrics:\n  max_timers: 1\ndemo:\n  avg_duration_ms: 0\n  std_dev_ms: 0\n",
    );

    get(&app, "/healthz").await;
    let (status, body) = get(&app, "/hello/bob").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Hello bob!");
    assert_eq!(registry.len(), 1);
    assert_eq!(count(&registry, "timer.GET.200.healthz"), 1);
}
