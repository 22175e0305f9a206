//! HTTP status series (leading digit class).

/// Status class of an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSeries {
    Informational,
    Successful,
    Redirection,
    ClientError,
    ServerError,
}

impl StatusSeries {
    /// Classify a status code. Codes outside 100..=599 (including the 999
    /// sentinel) have no series.
    pub fn of(status: u16) -> Option<Self> {
        match status {
            100..=199 => Some(StatusSeries::Informational),
            200..=299 => Some(StatusSeries::Successful),
            300..=399 => Some(StatusSeries::Redirection),
            400..=499 => Some(StatusSeries::ClientError),
            500..=599 => Some(StatusSeries::ServerError),
            _ => None,
        }
    }

    /// Series whose requests without a matched route collapse into `/unmapped`.
    pub fn is_unmapped_candidate(self) -> bool {
        matches!(self, StatusSeries::Redirection | StatusSeries::ClientError)
    }
}
