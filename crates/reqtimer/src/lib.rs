//! Top-level facade crate for reqtimer.
//!
//! Re-exports the core filter and the axum gateway so users can depend on a single crate.

pub mod core {
    pub use reqtimer_core::*;
}

pub mod gateway {
    pub use reqtimer_gateway::*;
}
