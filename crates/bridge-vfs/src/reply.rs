//! Decoding of filesystem command replies.

use serde_json::{Map, Value};

/// Fields a host may put in a filesystem reply. All optional.
///
/// Each field is decoded on its own: a field with an unexpected type reads
/// as absent and never hides the others.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct HostReply {
    pub exists: Option<bool>,
    pub data: Option<Value>,
    pub size: Option<u64>,
    pub error: Option<String>,
    pub code: Option<u32>,
}

impl HostReply {
    /// Decode a reply payload.
    ///
    /// Non-object payloads are taken as the bare value: a boolean answers
    /// `exists`, anything else is the content.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(fields) => Self::from_fields(fields),
            Value::Bool(exists) => Self {
                exists: Some(*exists),
                ..Self::default()
            },
            Value::Null => Self::default(),
            other => Self {
                data: Some(other.clone()),
                ..Self::default()
            },
        }
    }

    fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            exists: fields.get("exists").and_then(Value::as_bool),
            data: fields.get("data").filter(|d| !d.is_null()).cloned(),
            size: fields.get("size").and_then(Value::as_u64),
            error: fields.get("error").and_then(error_text),
            code: fields
                .get("code")
                .and_then(Value::as_u64)
                .and_then(|c| u32::try_from(c).ok()),
        }
    }

    /// Error reported inside the payload, ignoring empty strings.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}

/// Text of an `error` field. Non-string errors keep their JSON form.
fn error_text(error: &Value) -> Option<String> {
    match error {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
