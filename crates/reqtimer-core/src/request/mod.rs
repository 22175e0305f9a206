//! Per-request state threaded through every dispatch cycle.
//!
//! The host owns one `RequestContext` per logical request and hands the same
//! value to the filter on each dispatch cycle, so the timer started on the
//! first cycle survives until the request completes.

pub mod lifecycle;
pub mod path;

use std::time::{Duration, Instant};

pub use lifecycle::Lifecycle;
pub use path::path_within_application;

/// Started stopwatch owned by exactly one request.
#[derive(Debug)]
pub struct TimerHandle {
    started: Instant,
}

impl TimerHandle {
    pub fn start() -> Self {
        Self { started: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Stop the stopwatch and return the measured duration.
    pub fn stop(self) -> Duration {
        self.started.elapsed()
    }
}

/// One logical HTTP request as seen by the timer filter.
#[derive(Debug)]
pub struct RequestContext {
    method: String,
    path: String,
    route_pattern: Option<String>,
    timer: Option<TimerHandle>,
    lifecycle: Lifecycle,
}

impl RequestContext {
    /// `path` is the effective path (see [`path_within_application`]).
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            route_pattern: None,
            timer: None,
            lifecycle: Lifecycle::Active,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn route_pattern(&self) -> Option<&str> {
        self.route_pattern.as_deref()
    }

    /// Recorded by the routing layer once a route matched.
    pub fn set_route_pattern(&mut self, pattern: impl Into<String>) {
        self.route_pattern = Some(pattern.into());
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Handler side: the request will be resumed by a later dispatch cycle.
    pub fn suspend(&mut self) {
        self.lifecycle = self.lifecycle.suspend();
    }

    /// Host side: a suspended request is being dispatched again.
    pub fn resume(&mut self) {
        self.lifecycle = self.lifecycle.resume();
    }

    pub(crate) fn complete(&mut self) {
        self.lifecycle = Lifecycle::Completed;
    }

    pub fn has_timer(&self) -> bool {
        self.timer.is_some()
    }

    /// Start a timer unless one is already attached.
    pub(crate) fn ensure_timer(&mut self) {
        if self.timer.is_none() {
            self.timer = Some(TimerHandle::start());
        }
    }

    pub(crate) fn take_timer(&mut self) -> Option<TimerHandle> {
        self.timer.take()
    }
}
