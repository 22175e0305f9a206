//! In-process metrics sink and log reporter.
//!
//! `TimerRegistry` receives the filter's samples; `reporter` periodically
//! writes every timer to the log, and the `/metrics` handler renders them as
//! Graphite plaintext.

pub mod metrics;
pub mod reporter;

pub use metrics::{TimerRegistry, TimerSnapshot};
pub use reporter::{spawn_reporter, ReportLine, Reporter};
