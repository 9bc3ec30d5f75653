//! Configuration Module - Environment-driven Metrics Settings
//!
//! Metrics behaviour is controlled entirely by environment-style
//! key/value pairs (STAGE, PROMETHEUS_*, DYNO, HEROKU_APP_NAME).
//! Values are read once at startup and never change afterwards.
//! Missing or malformed values never fail startup: the affected
//! feature is disabled or falls back to its default.
//!
//! The demo host's own settings (bind address, log level) live in
//! `config.toml` and are handled by [`loader`].

pub mod loader;

use std::time::Duration;

use tracing::warn;

/// Default push interval in milliseconds.
pub const DEFAULT_PUSH_RATE_MS: u64 = 10_000;

/// Default per-push HTTP timeout in milliseconds.
pub const DEFAULT_PUSH_TIMEOUT_MS: u64 = 5_000;

/// Default deployment stage label.
pub const DEFAULT_STAGE: &str = "dev";

/// Default instance identifier (job name and dyno label).
pub const DEFAULT_INSTANCE_ID: &str = "test";

/// Username/password pair as configured (either half may be unset).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialConfig {
  /// Expected or outgoing username.
  pub username: Option<String>,
  /// Expected or outgoing password.
  pub password: Option<String>,
}

/// Settings for the periodic Pushgateway push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushConfig {
  /// Whether the push loop should be started.
  pub enabled: bool,
  /// Gateway base URL (PROMETHEUS_PUSH_URL).
  pub url: Option<String>,
  /// Basic-auth credentials sent with every push.
  pub auth: CredentialConfig,
  /// Interval between pushes.
  pub interval: Duration,
  /// Upper bound on a single push request.
  pub timeout: Duration,
}

/// Deployment identity used to derive the push job name and groupings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
  /// Deployment stage (STAGE), defaults to `dev`.
  pub stage: String,
  /// Instance identifier (DYNO), defaults to `test`.
  pub instance_id: String,
  /// Application name (HEROKU_APP_NAME), optional.
  pub app_name: Option<String>,
}

/// Complete metrics configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
  /// Serve `/metrics` and install the timing middleware.
  pub serve_enabled: bool,
  /// Credentials required by the `/metrics` endpoint.
  pub serve_auth: CredentialConfig,
  /// Push loop settings.
  pub push: PushConfig,
  /// Deployment identity.
  pub deployment: DeploymentConfig,
}

impl MetricsConfig {
  /// Read the configuration from the process environment.
  pub fn from_env() -> Self {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Build the configuration from an arbitrary key lookup.
  ///
  /// Empty values are treated exactly like unset ones.
  pub fn from_lookup<F>(lookup: F) -> Self
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

    Self {
      serve_enabled: parse_flag(get("PROMETHEUS_ENABLED").as_deref()),
      serve_auth: CredentialConfig {
        username: get("PROMETHEUS_USERNAME"),
        password: get("PROMETHEUS_PASSWORD"),
      },
      push: PushConfig {
        enabled: parse_flag(get("PROMETHEUS_PUSH_ENABLED").as_deref()),
        url: get("PROMETHEUS_PUSH_URL"),
        auth: CredentialConfig {
          username: get("PROMETHEUS_PUSH_USERNAME"),
          password: get("PROMETHEUS_PUSH_PASSWORD"),
        },
        interval: Duration::from_millis(parse_millis(
          "PROMETHEUS_PUSH_RATE",
          get("PROMETHEUS_PUSH_RATE").as_deref(),
          DEFAULT_PUSH_RATE_MS,
        )),
        timeout: Duration::from_millis(parse_millis(
          "PROMETHEUS_PUSH_TIMEOUT",
          get("PROMETHEUS_PUSH_TIMEOUT").as_deref(),
          DEFAULT_PUSH_TIMEOUT_MS,
        )),
      },
      deployment: DeploymentConfig {
        stage: get("STAGE").unwrap_or_else(|| DEFAULT_STAGE.to_string()),
        instance_id: get("DYNO").unwrap_or_else(|| DEFAULT_INSTANCE_ID.to_string()),
        app_name: get("HEROKU_APP_NAME"),
      },
    }
  }
}

/// Interpret a feature flag value.
///
/// Unset, `0`, `false`, `no` and `off` (any case) are false; every
/// other non-empty value enables the feature.
pub fn parse_flag(value: Option<&str>) -> bool {
  match value.map(str::trim) {
    None | Some("") => false,
    Some(v) => !matches!(
      v.to_ascii_lowercase().as_str(),
      "0" | "false" | "no" | "off"
    ),
  }
}

/// Parse a positive millisecond value, falling back to `default`.
fn parse_millis(key: &str, value: Option<&str>, default: u64) -> u64 {
  let Some(raw) = value else {
    return default;
  };

  match raw.trim().parse::<u64>() {
    Ok(ms) if ms > 0 => ms,
    _ => {
      warn!(key, value = raw, default, "Invalid millisecond value, using default");
      default
    }
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;

  fn config_from(pairs: &[(&str, &str)]) -> MetricsConfig {
    let map: HashMap<String, String> = pairs
      .iter()
      .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
      .collect();
    MetricsConfig::from_lookup(|key| map.get(key).cloned())
  }

  #[test]
  fn test_defaults_when_nothing_is_set() {
    let config = config_from(&[]);

    assert!(!config.serve_enabled);
    assert!(!config.push.enabled);
    assert_eq!(config.push.interval, Duration::from_millis(10_000));
    assert_eq!(config.push.timeout, Duration::from_millis(5_000));
    assert_eq!(config.deployment.stage, "dev");
    assert_eq!(config.deployment.instance_id, "test");
    assert!(config.deployment.app_name.is_none());
    assert_eq!(config.serve_auth, CredentialConfig::default());
  }

  #[test]
  fn test_reads_all_keys() {
    let config = config_from(&[
      ("STAGE", "prod"),
      ("PROMETHEUS_ENABLED", "true"),
      ("PROMETHEUS_USERNAME", "scraper"),
      ("PROMETHEUS_PASSWORD", "hunter2"),
      ("PROMETHEUS_PUSH_ENABLED", "1"),
      ("PROMETHEUS_PUSH_URL", "https://push.example.com"),
      ("PROMETHEUS_PUSH_USERNAME", "pusher"),
      ("PROMETHEUS_PUSH_PASSWORD", "secret"),
      ("PROMETHEUS_PUSH_RATE", "2500"),
      ("DYNO", "web.1"),
      ("HEROKU_APP_NAME", "shop"),
    ]);

    assert!(config.serve_enabled);
    assert_eq!(config.serve_auth.username.as_deref(), Some("scraper"));
    assert_eq!(config.serve_auth.password.as_deref(), Some("hunter2"));
    assert!(config.push.enabled);
    assert_eq!(config.push.url.as_deref(), Some("https://push.example.com"));
    assert_eq!(config.push.auth.username.as_deref(), Some("pusher"));
    assert_eq!(config.push.interval, Duration::from_millis(2_500));
    assert_eq!(config.deployment.stage, "prod");
    assert_eq!(config.deployment.instance_id, "web.1");
    assert_eq!(config.deployment.app_name.as_deref(), Some("shop"));
  }

  #[test]
  fn test_empty_values_count_as_unset() {
    let config = config_from(&[
      ("STAGE", ""),
      ("DYNO", ""),
      ("PROMETHEUS_USERNAME", ""),
      ("HEROKU_APP_NAME", ""),
    ]);

    assert_eq!(config.deployment.stage, "dev");
    assert_eq!(config.deployment.instance_id, "test");
    assert!(config.serve_auth.username.is_none());
    assert!(config.deployment.app_name.is_none());
  }

  #[test]
  fn test_flag_parsing() {
    assert!(!parse_flag(None));
    assert!(!parse_flag(Some("")));
    assert!(!parse_flag(Some("0")));
    assert!(!parse_flag(Some("FALSE")));
    assert!(!parse_flag(Some("off")));
    assert!(parse_flag(Some("1")));
    assert!(parse_flag(Some("yes")));
    assert!(parse_flag(Some("True")));
  }

  #[test]
  fn test_bad_push_rate_falls_back() {
    let zero = config_from(&[("PROMETHEUS_PUSH_RATE", "0")]);
    assert_eq!(zero.push.interval, Duration::from_millis(10_000));

    let junk = config_from(&[("PROMETHEUS_PUSH_RATE", "fast")]);
    assert_eq!(junk.push.interval, Duration::from_millis(10_000));
  }
}
