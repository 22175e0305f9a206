//! Shared error types across reqtimer crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, ReqTimerError>;

/// Unified error type used by core and gateway (startup, config, input).
#[derive(Debug, Error)]
pub enum ReqTimerError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl ReqTimerError {
    /// Stable short code, used in logs and tests.
    pub fn code(&self) -> &'static str {
        match self {
            ReqTimerError::BadRequest(_) => "BAD_REQUEST",
            ReqTimerError::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ReqTimerError::Internal(_) => "INTERNAL",
        }
    }
}

/// The response status could not be read (closed or invalid response).
#[derive(Debug, Clone, Error)]
#[error("response status unavailable: {0}")]
pub struct StatusReadError(pub String);

/// A metrics sink refused a sample.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("timer '{key}' rejected: {reason}")]
    Rejected { key: String, reason: String },
    #[error("timer limit of {limit} reached")]
    CardinalityExceeded { limit: usize },
}
