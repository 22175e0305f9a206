//! Timer registry keyed by dot-delimited metric names.
//!
//! Timers are created on first update and stored as atomics in a `DashMap`, so
//! concurrent requests never contend on a global lock. Histogram buckets are
//! fixed in microseconds to avoid floating point math on the hot path.
//!
//! The `max_timers` ceiling is checked before insertion without holding a
//! lock across the check, so under a burst of brand-new keys the registry may
//! overshoot the limit by the number of concurrent inserters.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;

use reqtimer_core::error::SinkError;
use reqtimer_core::MetricsSink;

// 100us, 500us, 1ms, 5ms, 10ms, 50ms, 100ms, 500ms, 1s
const BUCKETS_MICROS: [u64; 9] = [100, 500, 1_000, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000];

struct AtomicTimer {
    count: AtomicU64,
    sum: AtomicU64,
    min: AtomicU64,
    max: AtomicU64,
    buckets: [AtomicU64; 9],
}

impl Default for AtomicTimer {
    fn default() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicU64::new(0),
            min: AtomicU64::new(u64::MAX),
            max: AtomicU64::new(0),
            buckets: Default::default(),
        }
    }
}

impl AtomicTimer {
    fn update(&self, micros: u64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum.fetch_add(micros, Ordering::Relaxed);
        self.min.fetch_min(micros, Ordering::Relaxed);
        self.max.fetch_max(micros, Ordering::Relaxed);

        // Cumulative buckets
        for (i, &b) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= b {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn snapshot(&self, name: &str) -> TimerSnapshot {
        let count = self.count.load(Ordering::Relaxed);
        let min = self.min.load(Ordering::Relaxed);
        TimerSnapshot {
            name: name.to_string(),
            count,
            sum_micros: self.sum.load(Ordering::Relaxed),
            min_micros: if count == 0 { 0 } else { min },
            max_micros: self.max.load(Ordering::Relaxed),
            buckets: BUCKETS_MICROS
                .iter()
                .zip(self.buckets.iter())
                .map(|(&le, c)| (le, c.load(Ordering::Relaxed)))
                .collect(),
        }
    }
}

/// Point-in-time copy of one timer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerSnapshot {
    pub name: String,
    pub count: u64,
    pub sum_micros: u64,
    pub min_micros: u64,
    pub max_micros: u64,
    /// `(upper bound in micros, cumulative count)`
    pub buckets: Vec<(u64, u64)>,
}

impl TimerSnapshot {
    pub fn mean_ms(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum_micros as f64 / self.count as f64 / 1000.0
    }

    pub fn min_ms(&self) -> f64 {
        self.min_micros as f64 / 1000.0
    }

    pub fn max_ms(&self) -> f64 {
        self.max_micros as f64 / 1000.0
    }
}

pub struct TimerRegistry {
    timers: DashMap<String, AtomicTimer>,
    max_timers: usize,
}

impl TimerRegistry {
    pub fn new(max_timers: usize) -> Self {
        Self {
            timers: DashMap::new(),
            max_timers: max_timers.max(1),
        }
    }

    /// Record one duration sample under `key`, creating the timer if needed.
    pub fn update(&self, key: &str, duration: Duration) -> Result<(), SinkError> {
        validate_key(key)?;
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);

        if let Some(timer) = self.timers.get(key) {
            timer.update(micros);
            return Ok(());
        }
        if self.timers.len() >= self.max_timers {
            return Err(SinkError::CardinalityExceeded { limit: self.max_timers });
        }
        self.timers
            .entry(key.to_string())
            .or_default()
            .update(micros);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<TimerSnapshot> {
        self.timers.get(key).map(|t| t.snapshot(key))
    }

    /// All timers, sorted by name.
    pub fn snapshot(&self) -> Vec<TimerSnapshot> {
        let mut out: Vec<TimerSnapshot> = self
            .timers
            .iter()
            .map(|r| r.value().snapshot(r.key()))
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    /// Render as Graphite plaintext lines (`<name>.<field> <value>`).
    pub fn render(&self) -> String {
        let mut out = String::new();
        for t in self.snapshot() {
            let _ = writeln!(out, "{}.count {}", t.name, t.count);
            let _ = writeln!(out, "{}.mean_ms {:.3}", t.name, t.mean_ms());
            let _ = writeln!(out, "{}.min_ms {:.3}", t.name, t.min_ms());
            let _ = writeln!(out, "{}.max_ms {:.3}", t.name, t.max_ms());
            for (le, count) in &t.buckets {
                let _ = writeln!(out, "{}.le_{}us {}", t.name, le, count);
            }
        }
        out
    }
}

impl MetricsSink for TimerRegistry {
    fn record(&self, key: &str, elapsed: Duration) -> Result<(), SinkError> {
        self.update(key, elapsed)
    }
}

/// Graphite names: no empty segments, no whitespace.
fn validate_key(key: &str) -> Result<(), SinkError> {
    let reject = |reason: &str| SinkError::Rejected {
        key: key.to_string(),
        reason: reason.to_string(),
    };
    if key.is_empty() {
        return Err(reject("empty name"));
    }
    if key.split('.').any(str::is_empty) {
        return Err(reject("empty segment"));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(reject("whitespace in name"));
    }
    Ok(())
}
