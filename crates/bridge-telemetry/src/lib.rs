//! # Bridge Telemetry
//!
//! Structured logging for the bridge crates, built on `tracing` and
//! `tracing-subscriber`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bridge_telemetry::{init_logging, TelemetryConfig};
//!
//! let _guard = init_logging(TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BRIDGE_SERVICE_NAME` | `webview-bridge` | Service name |
//! | `BRIDGE_LOG_LEVEL` / `RUST_LOG` | `info` | Filter directive |
//! | `BRIDGE_CONSOLE_OUTPUT` | `true` | Write logs at all |
//! | `BRIDGE_JSON_LOGS` | `false` | JSON lines output |

#![cfg_attr(test, allow(clippy::unwrap_used))]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_test_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install log subscriber: {0}")]
    Init(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install the global log subscriber.
///
/// Returns a guard to hold for the lifetime of the application. Fails if a
/// subscriber is already installed.
pub fn init_logging(config: TelemetryConfig) -> Result<LoggingGuard, TelemetryError> {
    logging::init_subscriber(&config)?;
    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        json = config.json_logs,
        "Logging initialized"
    );
    Ok(LoggingGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps logging active.
pub struct LoggingGuard {
    service_name: String,
}

impl Drop for LoggingGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down logging");
    }
}
