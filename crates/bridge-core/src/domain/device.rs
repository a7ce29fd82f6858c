//! Static device facts gathered by the readiness handshake.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version string reported in [`DeviceInfo::cordova`].
pub const BRIDGE_PLATFORM_VERSION: &str = "12.0.0-postmessage-bridge";

/// Device facts exposed to the application once the bridge is ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub platform: String,
    pub uuid: String,
    pub serial: String,
    pub cordova: String,
    pub model: String,
    pub version: String,
    pub manufacturer: String,
    pub is_virtual: bool,
}

impl DeviceInfo {
    /// Build from the three host replies.
    ///
    /// Each reply may be an object carrying the named field, or the bare value.
    #[must_use]
    pub fn from_replies(platform: &Value, uuid: &Value, serial: &Value) -> Self {
        Self::with_facts(
            reply_field(platform, "platform"),
            reply_field(uuid, "uuid"),
            reply_field(serial, "serial"),
        )
    }

    /// Best-effort values used when the host could not be queried.
    #[must_use]
    pub fn fallback() -> Self {
        Self::with_facts("Android".into(), "unknown".into(), "unknown".into())
    }

    fn with_facts(platform: String, uuid: String, serial: String) -> Self {
        Self {
            platform,
            uuid,
            serial,
            cordova: BRIDGE_PLATFORM_VERSION.to_string(),
            model: "Unknown".to_string(),
            version: "unknown".to_string(),
            manufacturer: "Unknown".to_string(),
            is_virtual: false,
        }
    }
}

/// `reply.field` when present and non-empty, else the reply itself.
fn reply_field(reply: &Value, field: &str) -> String {
    match reply.get(field) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(v) if !v.is_null() && v.as_str().is_none() => v.to_string(),
        _ => match reply {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    }
}
