//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated
//! configuration, the way the table-operator settings used to be
//! assembled here — there is just a lot less to configure for a ruleset
//! with no blinds, buy-ins, or bot counts.

use std::net::SocketAddr;
use std::time::Duration;

use coup_core::manager::DEFAULT_IDLE_TIMEOUT;

/// Complete server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address.
    pub bind: SocketAddr,
    /// Prometheus metrics exporter bind address.
    pub metrics_bind: SocketAddr,
    /// How long a room may sit with no request before it is evicted.
    pub idle_timeout: Duration,
    /// How often the idle-room sweep runs.
    pub idle_sweep_interval: Duration,
}

impl ServerConfig {
    /// Load configuration from environment variables, with optional
    /// CLI overrides taking priority.
    ///
    /// # Errors
    ///
    /// Returns an error if a provided value fails to parse.
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        metrics_bind_override: Option<SocketAddr>,
    ) -> Result<Self, ConfigError> {
        let bind = bind_override
            .or_else(|| std::env::var("SERVER_BIND").ok().and_then(|s| s.parse().ok()))
            .unwrap_or_else(|| "127.0.0.1:6969".parse().expect("default bind address is valid"));

        let metrics_bind = metrics_bind_override
            .or_else(|| {
                std::env::var("METRICS_BIND")
                    .ok()
                    .and_then(|s| s.parse().ok())
            })
            .unwrap_or_else(|| "127.0.0.1:9090".parse().expect("default metrics address is valid"));

        let idle_timeout = parse_env_or("ROOM_IDLE_TIMEOUT_SECS", DEFAULT_IDLE_TIMEOUT.as_secs());
        let idle_sweep_interval = parse_env_or("ROOM_IDLE_SWEEP_INTERVAL_SECS", 60u64);

        Ok(ServerConfig {
            bind,
            metrics_bind,
            idle_timeout: Duration::from_secs(idle_timeout),
            idle_sweep_interval: Duration::from_secs(idle_sweep_interval),
        })
    }

    /// Validate configuration after loading.
    ///
    /// # Errors
    ///
    /// Returns an error if the idle sweep interval is not strictly
    /// shorter than the idle timeout itself, which would let a room
    /// linger well past the window it was supposed to be reclaimed in.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.idle_sweep_interval >= self.idle_timeout {
            return Err(ConfigError::Invalid {
                var: "ROOM_IDLE_SWEEP_INTERVAL_SECS".to_string(),
                reason: format!(
                    "must be smaller than ROOM_IDLE_TIMEOUT_SECS ({}s)",
                    self.idle_timeout.as_secs()
                ),
            });
        }
        Ok(())
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {var}\nhint: {hint}")]
    MissingRequired { var: String, hint: String },
    #[error("invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = ServerConfig::from_env(None, None).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn sweep_interval_must_be_shorter_than_timeout() {
        let mut config = ServerConfig::from_env(None, None).unwrap();
        config.idle_sweep_interval = config.idle_timeout;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
