//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use passgate_core::error::{PassgateError, Result};

pub use schema::{
    GatewaySection, HookConfig, PassgateConfig, PasskeyApprovalConfig, RouteParam,
    UnverifiedPolicy,
};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PASSGATE_CONFIG";
/// Config path used when `PASSGATE_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "passgate.yaml";

pub fn load_from_env() -> Result<PassgateConfig> {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<PassgateConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| PassgateError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<PassgateConfig> {
    let cfg: PassgateConfig = serde_yaml::from_str(s)
        .map_err(|e| PassgateError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
