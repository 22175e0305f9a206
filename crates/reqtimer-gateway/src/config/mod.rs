//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use reqtimer_core::error::{ReqTimerError, Result};

pub use schema::{DemoSection, GatewayConfig, MetricsSection, ServerSection};

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "REQTIMER_CONFIG";

/// Config file used when `REQTIMER_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "reqtimer.yaml";

pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ReqTimerError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| ReqTimerError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
