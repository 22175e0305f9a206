use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use reqtimer_core::error::{ReqTimerError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub metrics: MetricsSection,

    #[serde(default)]
    pub demo: DemoSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ReqTimerError::UnsupportedVersion);
        }
        self.server.validate()?;
        self.metrics.validate()?;
        self.demo.validate()?;
        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            metrics: MetricsSection::default(),
            demo: DemoSection::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Context root stripped from request paths before naming, e.g. `/app`.
    #[serde(default)]
    pub context_path: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            context_path: String::new(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        let cp = &self.context_path;
        if !cp.is_empty() && (!cp.starts_with('/') || cp.ends_with('/')) {
            return Err(ReqTimerError::BadRequest(
                "server.context_path must be empty or start with '/' and not end with '/'".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            ReqTimerError::BadRequest(format!(
                "server.listen must be a valid SocketAddr: {}",
                self.listen
            ))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Upper bound on distinct timer keys held by the registry.
    #[serde(default = "default_max_timers")]
    pub max_timers: usize,

    #[serde(default = "default_report_interval_ms")]
    pub report_interval_ms: u64,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            max_timers: default_max_timers(),
            report_interval_ms: default_report_interval_ms(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if self.max_timers == 0 {
            return Err(ReqTimerError::BadRequest(
                "metrics.max_timers must be at least 1".into(),
            ));
        }
        if !(100..=3_600_000).contains(&self.report_interval_ms) {
            return Err(ReqTimerError::BadRequest(
                "metrics.report_interval_ms must be between 100 and 3600000".into(),
            ));
        }
        Ok(())
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }
}

/// Defaults for the `/hello/{name}` endpoint's simulated latency.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DemoSection {
    #[serde(default = "default_avg_duration_ms")]
    pub avg_duration_ms: u64,

    #[serde(default = "default_std_dev_ms")]
    pub std_dev_ms: u64,
}

impl Default for DemoSection {
    fn default() -> Self {
        Self {
            avg_duration_ms: default_avg_duration_ms(),
            std_dev_ms: default_std_dev_ms(),
        }
    }
}

impl DemoSection {
    pub fn validate(&self) -> Result<()> {
        if self.avg_duration_ms > MAX_DEMO_DURATION_MS || self.std_dev_ms > MAX_DEMO_DURATION_MS {
            return Err(ReqTimerError::BadRequest(format!(
                "demo durations must not exceed {MAX_DEMO_DURATION_MS} ms"
            )));
        }
        Ok(())
    }
}

/// Cap for simulated handler latency (also applied to query overrides).
pub const MAX_DEMO_DURATION_MS: u64 = 60_000;

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_max_timers() -> usize {
    10_000
}
fn default_report_interval_ms() -> u64 {
    1_000
}
fn default_avg_duration_ms() -> u64 {
    100
}
fn default_std_dev_ms() -> u64 {
    10
}
