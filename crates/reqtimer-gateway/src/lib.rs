//! reqtimer gateway library entry.
//!
//! Hosts the request timer filter inside an axum server: the tower adapter,
//! the in-process timer registry and its reporter, strict YAML config, and
//! the demo and operational endpoints. Consumed by the binary (`main.rs`)
//! and by integration tests.

pub mod app_state;
pub mod config;
pub mod demo;
pub mod filter;
pub mod obs;
pub mod ops;
pub mod router;
