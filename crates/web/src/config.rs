use std::net::SocketAddr;

use thiserror::Error;

use taskdesk_auth::{AuthConfig, ConfigError};

#[derive(Debug, Error)]
pub enum WebConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error(transparent)]
    Auth(#[from] ConfigError),
}

/// Runtime settings for the web shell.
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub bind_addr: SocketAddr,
    /// Mount the `/dev/*` endpoints that drive the in-memory provider.
    pub dev_events: bool,
    pub auth: AuthConfig,
}

impl WebConfig {
    pub const DEFAULT_BIND: &'static str = "0.0.0.0:8080";

    /// Create config from environment variables.
    ///
    /// - `TASKDESK_BIND`: listen address (default `0.0.0.0:8080`)
    /// - `TASKDESK_DEV_EVENTS`: `"1"` or `"true"` mounts `/dev/*`
    /// - identity variables, see [`AuthConfig::from_env`]
    pub fn from_env() -> Result<Self, WebConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, WebConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("TASKDESK_BIND").unwrap_or_else(|| Self::DEFAULT_BIND.to_string());
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|e: std::net::AddrParseError| {
            WebConfigError::Invalid {
                key: "TASKDESK_BIND",
                reason: e.to_string(),
            }
        })?;

        let dev_events = matches!(
            lookup("TASKDESK_DEV_EVENTS").as_deref(),
            Some("1") | Some("true"),
        );

        Ok(Self {
            bind_addr,
            dev_events,
            auth: AuthConfig::from_lookup(&lookup)?,
        })
    }

    #[must_use]
    pub fn with_dev_events(mut self, enabled: bool) -> Self {
        self.dev_events = enabled;
        self
    }
}
