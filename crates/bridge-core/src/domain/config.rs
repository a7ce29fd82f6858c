//! Bridge configuration.
//!
//! Set once when a [`Bridge`](crate::Bridge) is built and read by every
//! dispatcher call.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default reply deadline.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Upper bound accepted for a reply deadline (one hour).
pub const MAX_TIMEOUT_MS: u64 = 3_600_000;

/// Default retry budget. Carried in configuration only; the dispatcher never
/// re-sends on its own.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Bridge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Emit a diagnostic line per send and per reply
    pub debug_logging: bool,
    /// Reply deadline in milliseconds; 0 disables the deadline
    pub default_timeout_ms: u64,
    /// Accepted for compatibility, not acted on
    pub max_retries: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            debug_logging: true,
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl BridgeConfig {
    /// Read configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `BRIDGE_DEBUG`: diagnostic logging (default: true)
    /// - `BRIDGE_TIMEOUT_MS`: reply deadline, 0 = none (default: 5000)
    /// - `BRIDGE_MAX_RETRIES`: retry budget (default: 3)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let debug_logging = match lookup("BRIDGE_DEBUG") {
            Some(v) => parse_bool("BRIDGE_DEBUG", &v)?,
            None => defaults.debug_logging,
        };

        let default_timeout_ms = match lookup("BRIDGE_TIMEOUT_MS") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "BRIDGE_TIMEOUT_MS".into(),
                value: v,
            })?,
            None => defaults.default_timeout_ms,
        };

        let max_retries = match lookup("BRIDGE_MAX_RETRIES") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "BRIDGE_MAX_RETRIES".into(),
                value: v,
            })?,
            None => defaults.max_retries,
        };

        let config = Self {
            debug_logging,
            default_timeout_ms,
            max_retries,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON configuration document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_timeout_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::InvalidValue {
                key: "default_timeout_ms".into(),
                value: self.default_timeout_ms.to_string(),
            });
        }
        Ok(())
    }

    /// Effective deadline for a send: the override when given, otherwise the
    /// default. `None` means no deadline.
    #[must_use]
    pub fn effective_timeout(&self, override_ms: Option<u64>) -> Option<Duration> {
        match override_ms.unwrap_or(self.default_timeout_ms) {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.into(),
            value: value.into(),
        }),
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("invalid configuration document: {0}")]
    Parse(String),
}
