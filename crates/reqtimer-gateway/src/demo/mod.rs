//! Demo endpoint with simulated, normally distributed latency.
//!
//! `GET /hello/{name}?avgDuration=<ms>&stdDev=<ms>` sleeps for a sample drawn
//! from N(avgDuration, stdDev^2) and greets `name`. Omitted parameters fall
//! back to the `demo` config section.

use std::time::Duration;

use axum::extract::{Path, Query, State};
use rand::Rng;
use serde::Deserialize;

use crate::app_state::AppState;
use crate::config::schema::MAX_DEMO_DURATION_MS;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelloParams {
    pub avg_duration: Option<u64>,
    pub std_dev: Option<u64>,
}

pub async fn hello(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<HelloParams>,
) -> String {
    let demo = &state.cfg().demo;
    let avg = params.avg_duration.unwrap_or(demo.avg_duration_ms);
    let std_dev = params.std_dev.unwrap_or(demo.std_dev_ms);
    // ThreadRng is !Send; sample before the await point.
    let delay = sample_delay(avg, std_dev, &mut rand::thread_rng());

    tokio::time::sleep(delay).await;
    format!("Hello {name}!")
}

/// Draw a delay from N(avg, std_dev^2) milliseconds (Box-Muller), clamped to
/// `0..=MAX_DEMO_DURATION_MS`.
pub fn sample_delay<R: Rng>(avg_ms: u64, std_dev_ms: u64, rng: &mut R) -> Duration {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();

    let ms = (avg_ms as f64 + z * std_dev_ms as f64).clamp(0.0, MAX_DEMO_DURATION_MS as f64);
    Duration::from_micros((ms * 1000.0) as u64)
}
