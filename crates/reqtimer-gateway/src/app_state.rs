//! Shared application state for the reqtimer gateway.

use std::sync::Arc;

use reqtimer_core::error::Result;

use crate::config::GatewayConfig;
use crate::obs::TimerRegistry;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    registry: Arc<TimerRegistry>,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        cfg.validate()?;
        let registry = Arc::new(TimerRegistry::new(cfg.metrics.max_timers));
        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, registry }),
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> Arc<TimerRegistry> {
        Arc::clone(&self.inner.registry)
    }
}
