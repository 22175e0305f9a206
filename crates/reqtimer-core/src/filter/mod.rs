//! Request timer filter.
//!
//! Wraps the next stage of a request-processing chain with a stopwatch and
//! emits one duration sample per logical request to a [`MetricsSink`]. The
//! filter is re-entrant across dispatch cycles: the timer lives in the
//! [`RequestContext`], is started on the first cycle, and is finalized on the
//! first cycle that ends without the request being suspended.
//!
//! Instrumentation fails open:
//! - an unreadable status is recorded as 999;
//! - a sink error is logged and dropped;
//! - errors from the next stage are returned unchanged, after timing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{SinkError, StatusReadError};
use crate::naming::{metric_key, UNDEFINED_HTTP_STATUS};
use crate::request::RequestContext;

/// Status recorded when the next stage failed without producing a response.
pub const FAILED_CHAIN_STATUS: u16 = 500;

/// A response whose status code can be read (possibly failing).
pub trait StatusSource {
    fn status(&self) -> Result<u16, StatusReadError>;
}

/// The rest of the processing chain, invoked once per dispatch cycle.
///
/// Implementations may record the matched route pattern or suspend the
/// request through the context they receive.
#[async_trait]
pub trait Chain: Send {
    type Response: StatusSource + Send;
    type Error: Send;

    async fn proceed(self, ctx: &mut RequestContext) -> Result<Self::Response, Self::Error>;
}

/// Destination for duration samples. Must tolerate concurrent calls.
pub trait MetricsSink: Send + Sync {
    fn record(&self, key: &str, elapsed: Duration) -> Result<(), SinkError>;
}

impl<T: MetricsSink + ?Sized> MetricsSink for Arc<T> {
    fn record(&self, key: &str, elapsed: Duration) -> Result<(), SinkError> {
        (**self).record(key, elapsed)
    }
}

/// Read a response status, substituting the sentinel on failure.
pub fn read_status<R: StatusSource>(response: &R) -> u16 {
    match response.status() {
        Ok(status) => status,
        Err(e) => {
            debug!(error = %e, "status unreadable; using sentinel");
            UNDEFINED_HTTP_STATUS
        }
    }
}

pub struct RequestTimerFilter<S> {
    sink: S,
}

impl<S: MetricsSink> RequestTimerFilter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run one dispatch cycle of `ctx` through `chain`, timing it.
    ///
    /// If the cycle never returns normally (the chain panics, or this future
    /// is dropped mid-flight), the request is still finalized, with status
    /// 500.
    pub async fn filter<C>(
        &self,
        ctx: &mut RequestContext,
        chain: C,
    ) -> Result<C::Response, C::Error>
    where
        C: Chain,
    {
        if ctx.lifecycle().is_completed() {
            debug!(method = %ctx.method(), path = %ctx.path(), "request already completed; not timed again");
            return chain.proceed(ctx).await;
        }

        // Only this cycle's handler may leave the request suspended.
        ctx.resume();
        ctx.ensure_timer();
        let mut cycle = DispatchCycle {
            filter: self,
            path: ctx.path().to_string(),
            ctx,
            armed: true,
        };

        let outcome = chain.proceed(&mut *cycle.ctx).await;
        let status = match &outcome {
            Ok(response) => read_status(response),
            Err(_) => FAILED_CHAIN_STATUS,
        };

        if cycle.ctx.lifecycle().is_suspended() {
            cycle.disarm();
        } else {
            cycle.finish(status);
        }
        outcome
    }

    /// Stop and detach the timer, mark the request completed, emit the sample.
    fn finalize(&self, ctx: &mut RequestContext, path: &str, status: u16) {
        ctx.complete();
        if let Some(timer) = ctx.take_timer() {
            self.record_time(ctx, path, status, timer.stop());
        }
    }

    fn record_time(&self, ctx: &RequestContext, path: &str, status: u16, elapsed: Duration) {
        let key = metric_key(ctx.method(), path, ctx.route_pattern(), status);
        if let Err(e) = self.sink.record(&key, elapsed) {
            warn!(key = %key, error = %e, "unable to submit timer");
        }
    }
}

/// One in-flight dispatch cycle. Dropping it while still armed (panic or
/// cancellation) finalizes the request as failed.
struct DispatchCycle<'a, S: MetricsSink> {
    filter: &'a RequestTimerFilter<S>,
    ctx: &'a mut RequestContext,
    path: String,
    armed: bool,
}

impl<S: MetricsSink> DispatchCycle<'_, S> {
    fn finish(mut self, status: u16) {
        self.armed = false;
        self.filter.finalize(self.ctx, &self.path, status);
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<S: MetricsSink> Drop for DispatchCycle<'_, S> {
    fn drop(&mut self) {
        if self.armed {
            warn!(method = %self.ctx.method(), path = %self.path, "dispatch cycle aborted before completion");
            self.filter.finalize(self.ctx, &self.path, FAILED_CHAIN_STATUS);
        }
    }
}
