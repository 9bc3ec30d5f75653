//! Host Configuration Loader - config.toml for the Demo Server
//!
//! The metrics add-on reads its own settings from the environment;
//! this loader only covers the host process: where to listen and
//! how to log. A missing file yields defaults so the host can run
//! without any configuration at all.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

/// Top-level host configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostConfig {
  /// HTTP server settings.
  #[serde(default)]
  pub server: ServerConfig,
}

/// HTTP server settings for the demo host.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  /// Listen address.
  #[serde(default = "default_bind_address")]
  pub bind_address: String,
  /// Log level used when RUST_LOG is unset.
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// Emit JSON log lines instead of the human-readable format.
  #[serde(default)]
  pub json_logs: bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: default_bind_address(),
      log_level: default_log_level(),
      json_logs: false,
    }
  }
}

fn default_bind_address() -> String {
  "0.0.0.0:3000".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

/// Load and validate the host configuration.
///
/// # Errors
/// Returns an error if the file exists but cannot be read, fails
/// TOML parsing, or violates validation rules.
pub fn load_config(path: &str) -> Result<HostConfig> {
  let path = Path::new(path);

  if !path.exists() {
    return Ok(HostConfig::default());
  }

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    bind_address = %config.server.bind_address,
    "Host configuration loaded"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<HostConfig> {
  let config: HostConfig = toml::from_str(content)
    .with_context(|| "Failed to parse config.toml")?;

  validate_config(&config)?;
  Ok(config)
}

fn validate_config(config: &HostConfig) -> Result<()> {
  anyhow::ensure!(
    config
      .server
      .bind_address
      .parse::<std::net::SocketAddr>()
      .is_ok(),
    "server.bind_address must be a socket address, got {}",
    config.server.bind_address
  );
  anyhow::ensure!(
    !config.server.log_level.trim().is_empty(),
    "server.log_level must not be empty"
  );

  Ok(())
}
