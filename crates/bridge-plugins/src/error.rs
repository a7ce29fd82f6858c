//! Plugin error types.

use crate::http::HttpResponse;
use bridge_core::BridgeError;
use thiserror::Error;

/// Status reported when the request never produced an HTTP status.
pub const NO_STATUS: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// The host replied with something the plugin cannot use.
    #[error("invalid reply to {command}: {reason}")]
    InvalidReply { command: String, reason: String },
}

/// A failed HTTP request.
///
/// Either the host answered with a non-2xx status (`response` is set), or
/// the bridge call itself failed (`status` is [`NO_STATUS`], `error` is set).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("HTTP request failed with status {status}")]
pub struct HttpFailure {
    pub status: i32,
    pub error: Option<String>,
    pub response: Option<HttpResponse>,
}

impl HttpFailure {
    pub(crate) fn from_status(response: HttpResponse) -> Self {
        Self {
            status: response.status,
            error: None,
            response: Some(response),
        }
    }

    pub(crate) fn from_bridge(err: &BridgeError) -> Self {
        Self {
            status: NO_STATUS,
            error: Some(err.to_string()),
            response: None,
        }
    }

    /// True when the host was never reached or never answered.
    pub fn is_transport_failure(&self) -> bool {
        self.status == NO_STATUS
    }
}

impl From<BridgeError> for HttpFailure {
    fn from(err: BridgeError) -> Self {
        Self::from_bridge(&err)
    }
}
