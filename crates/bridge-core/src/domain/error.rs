//! Bridge error taxonomy.
//!
//! Every failure reaches the caller through its own reply future; none of
//! them stop the bridge.

use crate::domain::config::ConfigError;
use crate::domain::correlation::RequestId;
use bridge_channel::ChannelError;

/// Why a command failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// No reply before the deadline. Re-sending is always allowed.
    #[error("Timeout: {command} did not respond within {timeout_ms}ms")]
    Timeout { command: String, timeout_ms: u64 },

    /// The host answered with an error string, reported verbatim.
    #[error("{0}")]
    Host(String),

    /// Posting on the channel failed.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The reply continuation vanished without settling.
    #[error("reply channel dropped before settlement")]
    Disconnected,

    /// Deadline timers need a tokio runtime.
    #[error("no async runtime available: {0}")]
    NoRuntime(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl BridgeError {
    /// True for deadline failures.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// True when the host itself reported the failure.
    #[must_use]
    pub fn is_host_error(&self) -> bool {
        matches!(self, Self::Host(_))
    }
}

impl From<ChannelError> for BridgeError {
    fn from(e: ChannelError) -> Self {
        Self::Transport(e.to_string())
    }
}

/// Request registry errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("request id already registered: {0}")]
    Duplicate(RequestId),
}

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;
