//! Periodic log reporter for the timer registry.
//!
//! Every interval, each timer is written as one `info!` event with its total
//! count, the request rate since the previous report (per second) and its
//! durations in milliseconds.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::metrics::TimerRegistry;

/// One reported timer.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub name: String,
    pub count: u64,
    pub rate_per_sec: f64,
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Remembers counts between reports to derive rates.
pub struct Reporter {
    registry: Arc<TimerRegistry>,
    last_counts: HashMap<String, u64>,
}

impl Reporter {
    pub fn new(registry: Arc<TimerRegistry>) -> Self {
        Self {
            registry,
            last_counts: HashMap::new(),
        }
    }

    /// Build report lines for a window of `elapsed`.
    pub fn collect(&mut self, elapsed: Duration) -> Vec<ReportLine> {
        let secs = elapsed.as_secs_f64();
        self.registry
            .snapshot()
            .into_iter()
            .map(|t| {
                let prev = self.last_counts.insert(t.name.clone(), t.count).unwrap_or(0);
                let delta = t.count.saturating_sub(prev);
                ReportLine {
                    rate_per_sec: if secs > 0.0 { delta as f64 / secs } else { 0.0 },
                    mean_ms: t.mean_ms(),
                    min_ms: t.min_ms(),
                    max_ms: t.max_ms(),
                    count: t.count,
                    name: t.name,
                }
            })
            .collect()
    }

    pub fn report(&mut self, elapsed: Duration) {
        for line in self.collect(elapsed) {
            tracing::info!(
                timer = %line.name,
                count = line.count,
                rate_per_sec = line.rate_per_sec,
                mean_ms = line.mean_ms,
                min_ms = line.min_ms,
                max_ms = line.max_ms,
                "timer report"
            );
        }
    }
}

/// Spawn the reporter loop on the current runtime.
pub fn spawn_reporter(registry: Arc<TimerRegistry>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reporter = Reporter::new(registry);
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            reporter.report(interval);
        }
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn rate_is_derived_from_count_delta() {
        let reg = Arc::new(TimerRegistry::new(10));
        let mut reporter = Reporter::new(Arc::clone(&reg));

        for _ in 0..4 {
            reg.update("timer.GET.200.root", Duration::from_millis(2)).unwrap();
        }
        let first = reporter.collect(Duration::from_secs(2));
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].count, 4);
        assert_eq!(first[0].rate_per_sec, 2.0);
        assert_eq!(first[0].mean_ms, 2.0);

        reg.update("timer.GET.200.root", Duration::from_millis(2)).unwrap();
        let second = reporter.collect(Duration::from_secs(1));
        assert_eq!(second[0].count, 5);
        assert_eq!(second[0].rate_per_sec, 1.0);
    }

    #[test]
    fn empty_registry_reports_nothing() {
        let mut reporter = Reporter::new(Arc::new(TimerRegistry::new(10)));
        assert!(reporter.collect(Duration::from_secs(1)).is_empty());
    }
}
