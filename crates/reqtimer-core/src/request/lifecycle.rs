//! Logical request lifecycle across dispatch cycles.

/// Where a logical request is in its life.
///
/// A request may leave a dispatch cycle suspended (an async handler will
/// resume it later) and re-enter the filter on the next cycle. Timing is
/// finalized only when a cycle ends without the request being suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Active,
    SuspendedForContinuation,
    Completed,
}

impl Lifecycle {
    /// Active -> SuspendedForContinuation. Other states are kept.
    pub fn suspend(self) -> Self {
        match self {
            Lifecycle::Active => Lifecycle::SuspendedForContinuation,
            other => other,
        }
    }

    /// SuspendedForContinuation -> Active. Other states are kept.
    pub fn resume(self) -> Self {
        match self {
            Lifecycle::SuspendedForContinuation => Lifecycle::Active,
            other => other,
        }
    }

    pub fn is_suspended(self) -> bool {
        self == Lifecycle::SuspendedForContinuation
    }

    pub fn is_completed(self) -> bool {
        self == Lifecycle::Completed
    }
}
