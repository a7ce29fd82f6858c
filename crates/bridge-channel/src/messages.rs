//! # Bridge Messages
//!
//! Envelope types exchanged over the channel. The `type` field is the
//! discriminator; anything without a recognised `type` is foreign traffic.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::port::ChannelError;

/// Protocol messages carried on the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BridgeMessage {
    /// Bridge → host. A command to execute.
    BridgeRequest(RequestEnvelope),

    /// Host → bridge. The reply to exactly one request.
    BridgeResponse(ResponseEnvelope),

    /// Bridge → host. Posted once when the bridge is listening.
    BridgeReady,

    /// Host → bridge. Triggers the readiness handshake.
    PlatformReady,
}

impl BridgeMessage {
    /// Classify a raw frame. Returns `None` for foreign or malformed frames.
    #[must_use]
    pub fn from_frame(frame: &Value) -> Option<Self> {
        MessageKind::of(frame)?;
        serde_json::from_value(frame.clone()).ok()
    }

    /// Serialize into a raw frame.
    pub fn to_frame(&self) -> Result<Value, ChannelError> {
        serde_json::to_value(self).map_err(|e| ChannelError::Serialization(e.to_string()))
    }

    /// Discriminator of this message.
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::BridgeRequest(_) => MessageKind::BridgeRequest,
            Self::BridgeResponse(_) => MessageKind::BridgeResponse,
            Self::BridgeReady => MessageKind::BridgeReady,
            Self::PlatformReady => MessageKind::PlatformReady,
        }
    }
}

/// Request envelope. Immutable once posted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Correlation id
    pub id: String,
    /// Command name understood by the host
    pub command: String,
    /// Command arguments
    #[serde(default)]
    pub data: Value,
    /// Send time, milliseconds since the Unix epoch
    pub timestamp: u64,
}

/// Response envelope.
///
/// When `error` is present the payload is ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Correlation id of the request being answered
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseEnvelope {
    /// Successful reply.
    pub fn success(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data: Some(data),
            error: None,
        }
    }

    /// Failed reply.
    pub fn failure(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: None,
            error: Some(error.into()),
        }
    }

    /// Host error, if any. An empty error string counts as no error.
    #[must_use]
    pub fn host_error(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}

/// Discriminator values of [`BridgeMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    BridgeRequest,
    BridgeResponse,
    BridgeReady,
    PlatformReady,
}

impl MessageKind {
    /// Wire value of the `type` field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BridgeRequest => "BRIDGE_REQUEST",
            Self::BridgeResponse => "BRIDGE_RESPONSE",
            Self::BridgeReady => "BRIDGE_READY",
            Self::PlatformReady => "PLATFORM_READY",
        }
    }

    /// Read the discriminator of a raw frame without decoding the rest.
    #[must_use]
    pub fn of(frame: &Value) -> Option<Self> {
        match frame.get("type")?.as_str()? {
            "BRIDGE_REQUEST" => Some(Self::BridgeRequest),
            "BRIDGE_RESPONSE" => Some(Self::BridgeResponse),
            "BRIDGE_READY" => Some(Self::BridgeReady),
            "PLATFORM_READY" => Some(Self::PlatformReady),
            _ => None,
        }
    }
}
