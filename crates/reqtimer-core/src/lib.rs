//! reqtimer core: request timing and metric-key derivation.
//!
//! This crate defines the request timer filter, the metric naming rules, and
//! the collaborator contracts (next stage, metrics sink) it is wired through.
//! It carries no HTTP server or runtime dependency so any host can embed it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Instrumentation failures are absorbed inside the filter; they never
//! change the response a caller receives.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod filter;
pub mod naming;
pub mod request;

/// Shared result type.
pub use error::{ReqTimerError, Result};
pub use filter::{Chain, MetricsSink, RequestTimerFilter, StatusSource};
pub use naming::metric_key;
pub use request::{Lifecycle, RequestContext, TimerHandle};
