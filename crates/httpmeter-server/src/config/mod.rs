//! Service config loader (strict parsing).

pub mod schema;

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use httpmeter_core::error::{MeterError, Result};

pub use schema::{AppConfig, DemoSection, MetricsSection, ServerSection, HTTP_LATENCY_BUCKETS};

pub fn load_from_file(path: impl AsRef<Path>) -> Result<AppConfig> {
    let s = fs::read_to_string(path.as_ref())
        .map_err(|e| MeterError::InvalidConfig(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AppConfig> {
    let cfg: AppConfig = serde_yaml::from_str(s)
        .map_err(|e| MeterError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `path` if it exists, otherwise fall back to built-in defaults.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    if path.exists() {
        load_from_file(path)
    } else {
        tracing::info!(path = %path.display(), "config file not found, using defaults");
        Ok(AppConfig::default())
    }
}

/// Replace the port of `server.listen` (the `PORT` environment variable).
pub fn apply_port_override(cfg: &mut AppConfig, port: &str) -> Result<()> {
    let port: u16 = port
        .trim()
        .parse()
        .map_err(|_| MeterError::InvalidConfig(format!("PORT must be a port number, got {port:?}")))?;
    let mut addr: SocketAddr = cfg.server.listen_addr()?;
    addr.set_port(port);
    cfg.server.listen = addr.to_string();
    Ok(())
}
